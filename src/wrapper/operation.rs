//! Pluggable passes over wrappers.

use super::Wrapper;

/// A pass with one hook per wrapper variant.
///
/// Every hook defaults to a no-op, so an operation only overrides the
/// variants it cares about and several operations compose over the same
/// layer. Dispatch goes through [`Wrapper::calculate`].
///
/// Hooks get `&mut Wrapper` but can only change interest and position;
/// adjacency is fixed once the layer is built. `container` is `None` for
/// every wrapper visited by [`GraphLayer::calculate`].
///
/// [`GraphLayer::calculate`]: crate::layer::GraphLayer::calculate
pub trait WrapperOperation {
    /// Visit a leaf wrapper.
    fn leaf(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {}

    /// Visit a horizontal chain.
    fn horizontal(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {}

    /// Visit a vertical group.
    fn vertical(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {}

    /// Visit a space filler.
    fn space(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {}

    /// Visit a generic container.
    fn combine(&mut self, _wrapper: &mut Wrapper, _container: Option<&Wrapper>) {}
}
