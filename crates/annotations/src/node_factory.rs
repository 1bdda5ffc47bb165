use scene::VisualNode;
use scene::components::Drawable3D;

use crate::annotation::Annotation;
use crate::config::MarkerStyle;

/// Chooses the visual for an annotation once its anchor materializes.
///
/// Returning `None` means "no preference": the manager then uses
/// [`default_marker`].
pub trait NodeFactory {
    fn create_node(&mut self, annotation: &Annotation) -> Option<VisualNode>;
}

/// Always defers to the default marker.
#[derive(Debug, Default, Copy, Clone)]
pub struct DefaultNodeFactory;

impl NodeFactory for DefaultNodeFactory {
    fn create_node(&mut self, _annotation: &Annotation) -> Option<VisualNode> {
        None
    }
}

/// Adapter that lets a closure act as a [`NodeFactory`].
#[derive(Debug, Copy, Clone)]
pub struct FactoryFn<F>(pub F);

impl<F> NodeFactory for FactoryFn<F>
where
    F: FnMut(&Annotation) -> Option<VisualNode>,
{
    fn create_node(&mut self, annotation: &Annotation) -> Option<VisualNode> {
        (self.0)(annotation)
    }
}

pub fn node_factory_fn<F>(f: F) -> FactoryFn<F>
where
    F: FnMut(&Annotation) -> Option<VisualNode>,
{
    FactoryFn(f)
}

impl<T: NodeFactory + ?Sized> NodeFactory for Box<T> {
    fn create_node(&mut self, annotation: &Annotation) -> Option<VisualNode> {
        (**self).create_node(annotation)
    }
}

pub fn default_marker(style: &MarkerStyle) -> VisualNode {
    VisualNode::with_drawable(Drawable3D::sphere(style.radius_m).with_color(style.color))
        .named("annotation-marker")
}
