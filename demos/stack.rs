use tracing_subscriber::EnvFilter;
use vecta::{BorderStyle, Direction, Ellipse, Frame, Rectangle, RenderOptions, Spec, Stack, StackChild, Text, render};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = Stack::new(
        Direction::Vertical,
        [
            StackChild::new(Text::new("Title")).with_size(0.15),
            StackChild::new(Rectangle::new().with_spec(Spec::new().with_aspect(3.0))),
            StackChild::new(Frame::new(Ellipse::circle()).with_padding(0.1).with_border(BorderStyle::default())),
            StackChild::new(Rectangle::new()).with_expand(false),
        ],
    )
    .with_spacing(0.02)
    .with_debug(std::env::var_os("VECTA_DEBUG").is_some());

    let svg = render(root, &RenderOptions::default())?;
    println!("{}", svg);
    Ok(())
}
