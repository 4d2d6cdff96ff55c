use tracing_subscriber::EnvFilter;
use vecta::{Element, Group, Point, Rectangle, RenderOptions, Spec, Text, render};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let label = |text: &str, x: f64| {
        Element::from(Text::new(text).with_spec(Spec::new().with_pos_rad(Point::new(x, 0.5), 0.15, 0.1)))
    };
    let boxed = |x: f64| Element::from(Rectangle::new().with_spec(Spec::new().with_pos_rad(Point::new(x, 0.5), 0.2, 0.15)));

    let root = Group::new([boxed(0.25), label("A", 0.25), boxed(0.75), label("B", 0.75)])
        .with_spec(Spec::new().with_aspect(2.0));

    let svg = render(root, &RenderOptions::default())?;
    println!("{}", svg);
    Ok(())
}
