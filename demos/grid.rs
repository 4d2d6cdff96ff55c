use tracing_subscriber::EnvFilter;
use vecta::{Element, Ellipse, Grid, Rectangle, RenderOptions, Spec, Text, render};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let wide = || Element::from(Rectangle::new().with_spec(Spec::new().with_aspect(2.0)));
    let root = Grid::new([
        vec![Text::new("name").into(), Text::new("shape").into()],
        vec![wide(), Ellipse::circle().into()],
        vec![wide(), Rectangle::square().into()],
    ])
    .with_spacing(0.02);

    let svg = render(root, &RenderOptions::default().with_size(600.0, 600.0))?;
    println!("{}", svg);
    Ok(())
}
