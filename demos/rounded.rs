use vecta::{Corners, Direction, Rectangle, RenderOptions, Spec, Stack, StackChild, render};

fn main() -> miette::Result<()> {
    // Increasing corner radii, as fractions of the shorter side
    let children = [0.0, 0.1, 0.25, 0.5].map(|r| {
        StackChild::new(
            Rectangle::new()
                .with_spec(Spec::new().with_aspect(1.5))
                .with_rounded(Corners::uniform(r)),
        )
    });
    let root = Stack::new(Direction::Horizontal, children).with_spacing(0.05);

    let svg = render(root, &RenderOptions::default())?;
    println!("{}", svg);
    Ok(())
}
