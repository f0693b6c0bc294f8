//! Builder-backed render fragments

use arbor_sink::{RenderFragment, RenderSink};

use crate::{BuildResult, BuilderConfig, TreeBuilder};

/// Fragment that describes its sub-tree with a fresh [`TreeBuilder`]
///
/// The builder is closed after `build` returns, so the last node does not
/// need an explicit `close()`. Sequences restart at zero inside the
/// fragment.
pub fn fragment<F>(build: F) -> RenderFragment
where
    F: for<'b, 's> Fn(&'b mut TreeBuilder<'s, dyn RenderSink + 's>) -> BuildResult<()> + 'static,
{
    fragment_with_config(BuilderConfig::default(), build)
}

/// [`fragment`] with an explicit builder configuration
pub fn fragment_with_config<F>(config: BuilderConfig, build: F) -> RenderFragment
where
    F: for<'b, 's> Fn(&'b mut TreeBuilder<'s, dyn RenderSink + 's>) -> BuildResult<()> + 'static,
{
    RenderFragment::new(move |sink: &mut dyn RenderSink| {
        let mut builder = TreeBuilder::with_config(sink, config.clone());
        build(&mut builder)?;
        builder.close()?;
        Ok(())
    })
}
