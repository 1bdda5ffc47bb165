use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::math::{GeoCoordinate, Mat4};
use scene::{NodeId, SceneGraph};
use tracing::debug;
use tracking::{AnchorId, MaterializationSource, TrackingAnchor, TrackingSession};

use crate::annotation::Annotation;
use crate::config::{AnnotationConfig, ConfigError, DistanceBounds};
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::node_factory::{DefaultNodeFactory, NodeFactory, default_marker};
use crate::placement::plan_placement;

/// Keeps tracking anchors, annotations, and their visual nodes in step.
///
/// Lifecycle of each placed annotation:
/// - *registered*: [`add_annotation`](Self::add_annotation) created an anchor
///   and handed it to the session; no node yet.
/// - *materialized*: the session reported the anchor through
///   [`on_node_added`](Self::on_node_added) and a visual node now hangs off
///   the session's placeholder.
/// - *removed*: every entry is gone; late notifications for the anchor are
///   ignored.
///
/// Invariants:
/// - `anchors` and `annotations_by_anchor` always hold the same anchor set.
/// - Every key of `annotations_by_node` is a node this manager spawned.
///
/// None of the operations fail; problems are recorded in [`diagnostics`](Self::diagnostics).
///
/// Dropping the manager clears the anchor token of every annotation it still
/// holds, so those annotations can be placed by another manager. Their
/// locations are kept.
pub struct AnnotationManager<S, G, F = DefaultNodeFactory> {
    session: S,
    scene: G,
    node_factory: F,
    config: AnnotationConfig,
    origin: Option<GeoCoordinate>,
    anchors: Vec<AnchorId>,
    annotations_by_anchor: PlacedAnnotations,
    annotations_by_node: BTreeMap<NodeId, Rc<Annotation>>,
    diagnostics: DiagnosticLog,
}

/// Anchor to annotation map. Releases the anchor tokens it still holds when
/// dropped.
#[derive(Default)]
struct PlacedAnnotations(BTreeMap<AnchorId, Rc<Annotation>>);

impl Drop for PlacedAnnotations {
    fn drop(&mut self) {
        for (anchor, annotation) in &self.0 {
            if annotation.anchor() == Some(*anchor) {
                annotation.set_anchor(None);
            }
        }
    }
}

impl<S, G> AnnotationManager<S, G>
where
    S: TrackingSession,
    G: SceneGraph,
{
    pub fn new(session: S, scene: G) -> Self {
        Self::from_parts(session, scene, DefaultNodeFactory, AnnotationConfig::default())
    }

    pub fn with_config(
        session: S,
        scene: G,
        config: AnnotationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(session, scene, DefaultNodeFactory, config))
    }
}

impl<S, G, F> AnnotationManager<S, G, F>
where
    S: TrackingSession,
    G: SceneGraph,
    F: NodeFactory,
{
    fn from_parts(session: S, scene: G, node_factory: F, config: AnnotationConfig) -> Self {
        Self {
            session,
            scene,
            node_factory,
            config,
            origin: None,
            anchors: Vec::new(),
            annotations_by_anchor: PlacedAnnotations::default(),
            annotations_by_node: BTreeMap::new(),
            diagnostics: DiagnosticLog::new(),
        }
    }

    /// Swap the node factory. Nodes already created are unaffected.
    pub fn with_node_factory<F2: NodeFactory>(
        self,
        node_factory: F2,
    ) -> AnnotationManager<S, G, F2> {
        AnnotationManager {
            session: self.session,
            scene: self.scene,
            node_factory,
            config: self.config,
            origin: self.origin,
            anchors: self.anchors,
            annotations_by_anchor: self.annotations_by_anchor,
            annotations_by_node: self.annotations_by_node,
            diagnostics: self.diagnostics,
        }
    }

    /// Location every subsequent placement is computed from.
    pub fn set_origin(&mut self, origin: GeoCoordinate) {
        self.origin = Some(origin);
    }

    pub fn origin(&self) -> Option<GeoCoordinate> {
        self.origin
    }

    /// Update either distance bound for future placements. Anchors that are
    /// already placed keep their transforms. On error nothing changes.
    pub fn set_anchor_distance_bounds(
        &mut self,
        min_m: Option<f64>,
        max_m: Option<f64>,
    ) -> Result<(), ConfigError> {
        let bounds = self.config.distance.updated(min_m, max_m).inspect_err(|err| {
            tracing::warn!("rejected anchor distance bounds: {err}");
        })?;
        self.config.distance = bounds;
        Ok(())
    }

    pub fn anchor_distance_bounds(&self) -> DistanceBounds {
        self.config.distance
    }

    /// Create an anchor for `annotation` and register it with the session.
    ///
    /// Requires a valid origin and a valid annotation location; otherwise the
    /// call records a diagnostic and changes nothing.
    pub fn add_annotation(&mut self, annotation: &Rc<Annotation>) {
        let Some(origin) = self.origin else {
            self.diagnostics.emit(Diagnostic::OriginNotSet {
                annotation: annotation.id(),
            });
            return;
        };
        if !origin.is_valid() {
            self.diagnostics.emit(Diagnostic::InvalidOrigin {
                annotation: annotation.id(),
                origin,
            });
            return;
        }
        let Some(location) = annotation.location() else {
            self.diagnostics.emit(Diagnostic::LocationMissing {
                annotation: annotation.id(),
            });
            return;
        };
        if !location.is_valid() {
            self.diagnostics.emit(Diagnostic::InvalidLocation {
                annotation: annotation.id(),
                location,
            });
            return;
        }
        if let Some(anchor) = annotation.anchor() {
            self.diagnostics.emit(Diagnostic::AlreadyPlaced {
                annotation: annotation.id(),
                anchor,
            });
            return;
        }

        let placement = plan_placement(&Mat4::IDENTITY, origin, location, self.config.distance);
        let anchor = TrackingAnchor::geo(placement.transform);
        let id = anchor.id();

        annotation.set_anchor(Some(id));
        self.session.add_anchor(anchor);
        self.anchors.push(id);
        self.annotations_by_anchor.0.insert(id, Rc::clone(annotation));

        debug!(
            "placed {} as anchor {} at {:.1} m, bearing {:.1} deg",
            annotation.id(),
            id.get(),
            placement.distance_m,
            placement.bearing_rad.to_degrees()
        );
    }

    /// Add each annotation in order; a rejected one does not stop the rest.
    pub fn add_annotations<'a>(
        &mut self,
        annotations: impl IntoIterator<Item = &'a Rc<Annotation>>,
    ) {
        for annotation in annotations {
            self.add_annotation(annotation);
        }
    }

    /// Unregister `annotation`'s anchor and release any node bound to it.
    ///
    /// Annotations that are not placed by this manager are left untouched.
    pub fn remove_annotation(&mut self, annotation: &Rc<Annotation>) {
        let Some(anchor) = annotation.anchor() else {
            return;
        };

        let position = self.anchors.iter().position(|a| *a == anchor);
        let mapped = self.annotations_by_anchor.0.get(&anchor).map(|a| a.id());

        match (position, mapped) {
            (None, None) => {
                debug!("{} is not placed by this manager", annotation.id());
                return;
            }
            (_, Some(other)) if other != annotation.id() => {
                self.diagnostics.emit(Diagnostic::InvariantViolation {
                    detail: format!(
                        "{} claims anchor {} which belongs to {other}",
                        annotation.id(),
                        anchor.get()
                    ),
                });
                return;
            }
            (Some(_), Some(_)) => {}
            (Some(_), None) | (None, Some(_)) => {
                self.diagnostics.emit(Diagnostic::InvariantViolation {
                    detail: format!(
                        "anchor {} of {} is only partially registered",
                        anchor.get(),
                        annotation.id()
                    ),
                });
            }
        }

        self.session.remove_anchor(anchor);
        if let Some(index) = position {
            self.anchors.remove(index);
        }
        self.annotations_by_anchor.0.remove(&anchor);
        annotation.set_anchor(None);

        let nodes = self.nodes_for(annotation);
        for node in nodes {
            self.release_node(node);
        }
        debug!("removed {} (anchor {})", annotation.id(), anchor.get());
    }

    pub fn remove_annotations<'a>(
        &mut self,
        annotations: impl IntoIterator<Item = &'a Rc<Annotation>>,
    ) {
        for annotation in annotations {
            self.remove_annotation(annotation);
        }
    }

    /// Unregister every anchor, release every node this manager attached,
    /// and forget all annotations. Each forgotten annotation also loses its
    /// location.
    pub fn remove_all_annotations(&mut self) {
        for anchor in &self.anchors {
            self.session.remove_anchor(*anchor);
        }

        let nodes: Vec<NodeId> = self.annotations_by_node.keys().copied().collect();
        for node in nodes {
            self.release_node(node);
        }

        let count = self.anchors.len();
        self.anchors.clear();
        for annotation in std::mem::take(&mut self.annotations_by_anchor.0).into_values() {
            annotation.set_anchor(None);
            annotation.set_location(None);
        }
        debug!("removed all {count} annotations");
    }

    /// Hide or show every node bound to an annotation.
    pub fn hide_all_nodes(&mut self, hidden: bool) {
        for node in self.annotations_by_node.keys() {
            if let Err(err) = self.scene.set_hidden(*node, hidden) {
                debug!("could not change visibility of {node}: {err}");
            }
        }
    }

    /// The session materialized `anchor` and parented `placeholder` into the
    /// scene. Anchors this manager does not know about are ignored.
    pub fn on_node_added(&mut self, anchor: AnchorId, placeholder: NodeId) {
        let Some(annotation) = self.annotations_by_anchor.0.get(&anchor).cloned() else {
            self.diagnostics.emit(Diagnostic::UnrecognizedAnchor { anchor });
            return;
        };

        let visual = self
            .node_factory
            .create_node(&annotation)
            .unwrap_or_else(|| default_marker(&self.config.marker));
        let node = self.scene.spawn(visual);
        if let Err(error) = self.scene.attach_child(placeholder, node) {
            let _ = self.scene.detach_from_parent(node);
            self.diagnostics.emit(Diagnostic::SceneRejected {
                annotation: annotation.id(),
                node: placeholder,
                error,
            });
            return;
        }

        debug!("bound {node} to {} under {placeholder}", annotation.id());
        self.annotations_by_node.insert(node, annotation);
    }

    /// Nodes currently bound to `annotation`.
    pub fn nodes_for(&self, annotation: &Annotation) -> Vec<NodeId> {
        self.annotations_by_node
            .iter()
            .filter(|(_, a)| a.id() == annotation.id())
            .map(|(node, _)| *node)
            .collect()
    }

    /// Registered anchors in registration order.
    pub fn anchors(&self) -> &[AnchorId] {
        &self.anchors
    }

    pub fn annotations_by_anchor(&self) -> &BTreeMap<AnchorId, Rc<Annotation>> {
        &self.annotations_by_anchor.0
    }

    pub fn annotations_by_node(&self) -> &BTreeMap<NodeId, Rc<Annotation>> {
        &self.annotations_by_node
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticLog {
        &mut self.diagnostics
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Direct session access, e.g. for anchors the host manages itself.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn scene(&self) -> &G {
        &self.scene
    }

    pub fn into_parts(self) -> (S, G, F) {
        (self.session, self.scene, self.node_factory)
    }

    fn release_node(&mut self, node: NodeId) {
        self.annotations_by_node.remove(&node);
        if !self.scene.contains(node) {
            // Already gone with its placeholder.
            return;
        }
        let mut released = 0usize;
        self.scene.enumerate_subtree(node, &mut |_| released += 1);
        match self.scene.detach_from_parent(node) {
            Ok(()) => debug!("released {node} ({released} nodes)"),
            Err(err) => debug!("could not release {node}: {err}"),
        }
    }
}

impl<S, G, F> AnnotationManager<S, G, F>
where
    S: TrackingSession + MaterializationSource,
    G: SceneGraph,
    F: NodeFactory,
{
    /// Let the session materialize pending anchors and bind nodes for every
    /// notification it produced. Returns the number of notifications handled.
    pub fn pump(&mut self) -> usize {
        let events = self.session.drain_node_added(&mut self.scene);
        let count = events.len();
        for event in events {
            self.on_node_added(event.anchor, event.placeholder);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::AnnotationManager;
    use crate::annotation::Annotation;
    use crate::config::{AnnotationConfig, ConfigError, DistanceBounds, MarkerStyle};
    use crate::diagnostics::{Diagnostic, DiagnosticKind};
    use crate::node_factory::{DefaultNodeFactory, node_factory_fn};
    use foundation::math::{GeoCoordinate, Mat4, Vec3, destination};
    use pretty_assertions::assert_eq;
    use scene::components::{Color, Drawable3D, Shape3D};
    use scene::{SceneGraph, VisualNode, World};
    use std::rc::Rc;
    use tracking::{AnchorKind, SimulatedSession, TrackingAnchor, TrackingSession};

    type Manager = AnnotationManager<SimulatedSession, World>;

    const ORIGIN: GeoCoordinate = GeoCoordinate {
        latitude: 45.0,
        longitude: 7.0,
        altitude: None,
    };

    fn manager() -> Manager {
        let mut m = AnnotationManager::new(SimulatedSession::new(), World::new());
        m.set_origin(ORIGIN);
        m
    }

    fn annotation_at(bearing_deg: f64, distance_m: f64) -> Rc<Annotation> {
        Annotation::new(destination(ORIGIN, bearing_deg.to_radians(), distance_m)).shared()
    }

    #[test]
    fn add_registers_anchor_with_session() {
        let mut m = manager();
        let a = annotation_at(90.0, 200.0);
        m.add_annotation(&a);

        let anchor = a.anchor().unwrap();
        assert_eq!(m.anchors(), &[anchor]);
        assert!(m.session().is_tracking(anchor));
        assert_eq!(m.annotations_by_anchor().get(&anchor), Some(&a));
        assert!(m.annotations_by_node().is_empty());

        let transform = m.session().anchor(anchor).unwrap().transform();
        let p = transform.translation();
        assert!((p - Vec3::new(200.0, 0.0, 0.0)).length() < 1e-6, "{p:?}");
    }

    #[test]
    fn add_without_location_is_a_no_op() {
        let mut m = manager();
        let a = Annotation::unlocated().shared();
        m.add_annotation(&a);
        assert!(m.anchors().is_empty());
        assert_eq!(a.anchor(), None);
        assert_eq!(
            m.diagnostics().last(),
            Some(&Diagnostic::LocationMissing { annotation: a.id() })
        );
    }

    #[test]
    fn add_with_invalid_location_is_a_no_op() {
        let mut m = manager();
        let a = Annotation::new(GeoCoordinate::new(120.0, 0.0)).shared();
        m.add_annotation(&a);
        assert!(m.anchors().is_empty());
        assert!(matches!(
            m.diagnostics().last(),
            Some(Diagnostic::InvalidLocation { .. })
        ));
    }

    #[test]
    fn add_with_invalid_origin_is_a_no_op() {
        let mut m = manager();
        m.set_origin(GeoCoordinate::new(f64::NAN, 7.0));
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        assert!(m.anchors().is_empty());
        assert_eq!(a.anchor(), None);
        assert_eq!(m.session().tracked_count(), 0);
        assert!(matches!(
            m.diagnostics().last(),
            Some(Diagnostic::InvalidOrigin { .. })
        ));

        m.set_origin(GeoCoordinate::new(45.0, 200.0));
        m.add_annotation(&a);
        assert!(m.anchors().is_empty());
    }

    #[test]
    fn adding_twice_keeps_first_placement() {
        let mut m = manager();
        let a = annotation_at(0.0, 150.0);
        m.add_annotation(&a);
        let first = a.anchor();
        m.add_annotation(&a);
        assert_eq!(a.anchor(), first);
        assert_eq!(m.anchors().len(), 1);
        assert!(matches!(
            m.diagnostics().last(),
            Some(Diagnostic::AlreadyPlaced { .. })
        ));
    }

    #[test]
    fn batch_add_skips_failures_and_keeps_order() {
        let mut m = manager();
        let a = annotation_at(10.0, 150.0);
        let bad = Annotation::unlocated().shared();
        let c = annotation_at(20.0, 150.0);
        m.add_annotations([&a, &bad, &c]);

        assert_eq!(m.anchors(), &[a.anchor().unwrap(), c.anchor().unwrap()]);
        assert_eq!(bad.anchor(), None);
    }

    #[test]
    fn materialization_binds_default_marker_under_placeholder() {
        let mut m = manager();
        let a = annotation_at(45.0, 130.0);
        m.add_annotation(&a);
        assert_eq!(m.pump(), 1);

        let nodes = m.nodes_for(&a);
        assert_eq!(nodes.len(), 1);
        let placeholder = m.session().placeholder(a.anchor().unwrap()).unwrap();
        assert_eq!(m.scene().parent(nodes[0]), Some(placeholder));

        let drawable = m.scene().drawable(nodes[0]).unwrap();
        assert_eq!(drawable.shape, Shape3D::Sphere { radius: 10.0 });
        assert_eq!(drawable.color, Color::RED);
    }

    #[test]
    fn node_factory_overrides_default() {
        let mut m = manager().with_node_factory(node_factory_fn(|a: &Annotation| {
            a.title().map(|t| {
                VisualNode::with_drawable(Drawable3D::cube(2.0))
                    .named(t)
                    .with_child(VisualNode::empty().named("label"))
            })
        }));
        let titled = Annotation::new(destination(ORIGIN, 1.0, 140.0))
            .with_title("Tower")
            .shared();
        let plain = annotation_at(200.0, 140.0);
        m.add_annotations([&titled, &plain]);
        m.pump();

        let titled_node = m.nodes_for(&titled)[0];
        assert_eq!(m.scene().name(titled_node), Some("Tower"));
        assert_eq!(m.scene().subtree_len(titled_node), 2);

        let plain_node = m.nodes_for(&plain)[0];
        assert_eq!(m.scene().name(plain_node), Some("annotation-marker"));
    }

    #[test]
    fn configured_marker_style_is_used() {
        let config = AnnotationConfig {
            distance: DistanceBounds::default(),
            marker: MarkerStyle {
                radius_m: 3.0,
                color: Color::rgb(0.0, 1.0, 0.0),
            },
        };
        let mut m =
            AnnotationManager::with_config(SimulatedSession::new(), World::new(), config).unwrap();
        m.set_origin(ORIGIN);
        let a = annotation_at(0.0, 500.0);
        m.add_annotation(&a);
        m.pump();

        let drawable = m.scene().drawable(m.nodes_for(&a)[0]).unwrap();
        assert_eq!(drawable.shape, Shape3D::Sphere { radius: 3.0 });
        assert_eq!(drawable.color, Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AnnotationConfig::default();
        config.marker.radius_m = -1.0;
        let result = AnnotationManager::with_config(SimulatedSession::new(), World::new(), config);
        assert!(matches!(result, Err(ConfigError::InvalidMarkerRadius(_))));
    }

    #[test]
    fn remove_after_materialization_releases_node() {
        let mut m = manager();
        let a = annotation_at(300.0, 200.0);
        m.add_annotation(&a);
        m.pump();
        let node = m.nodes_for(&a)[0];

        m.remove_annotation(&a);
        assert!(!m.scene().contains(node));
        assert!(m.annotations_by_node().is_empty());
        assert!(m.anchors().is_empty());
        assert_eq!(a.anchor(), None);
        assert!(a.location().is_some());

        m.pump();
        assert_eq!(m.scene().node_count(), 1);
    }

    #[test]
    fn annotation_can_be_placed_again_after_removal() {
        let mut m = manager();
        let a = annotation_at(300.0, 200.0);
        m.add_annotation(&a);
        let first = a.anchor().unwrap();
        m.remove_annotation(&a);
        m.add_annotation(&a);
        let second = a.anchor().unwrap();
        assert_ne!(first, second);
        assert_eq!(m.anchors(), &[second]);
    }

    #[test]
    fn dropping_manager_releases_anchor_tokens() {
        let a = annotation_at(300.0, 200.0);
        {
            let mut m = manager();
            m.add_annotation(&a);
            m.pump();
            assert!(a.is_placed());
        }
        assert_eq!(a.anchor(), None);
        assert!(a.location().is_some());

        let mut next = manager();
        next.add_annotation(&a);
        assert_eq!(next.anchors(), &[a.anchor().unwrap()]);
        next.remove_annotation(&a);
        next.add_annotation(&a);
        assert_eq!(next.anchors().len(), 1);
        assert!(a.is_placed());
    }

    #[test]
    fn swapping_node_factory_keeps_placements() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        let anchor = a.anchor();

        let m = m.with_node_factory(DefaultNodeFactory);
        assert_eq!(a.anchor(), anchor);
        assert_eq!(m.anchors().len(), 1);
    }

    #[test]
    fn remove_recovers_when_anchor_is_missing_from_order() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        m.pump();
        let anchor = a.anchor().unwrap();
        let node = m.nodes_for(&a)[0];
        m.anchors.clear();

        m.remove_annotation(&a);
        assert!(m.annotations_by_anchor().is_empty());
        assert!(m.annotations_by_node().is_empty());
        assert!(!m.session().is_tracking(anchor));
        assert!(!m.scene().contains(node));
        assert_eq!(a.anchor(), None);
        assert_eq!(
            m.diagnostics().last().map(Diagnostic::kind),
            Some(DiagnosticKind::InvariantViolation)
        );
    }

    #[test]
    fn remove_recovers_when_anchor_is_missing_from_map() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        let anchor = a.anchor().unwrap();
        m.annotations_by_anchor.0.clear();

        m.remove_annotation(&a);
        assert!(m.anchors().is_empty());
        assert!(!m.session().is_tracking(anchor));
        assert_eq!(a.anchor(), None);
        assert_eq!(
            m.diagnostics().last().map(Diagnostic::kind),
            Some(DiagnosticKind::InvariantViolation)
        );
    }

    #[test]
    fn remove_leaves_anchor_mapped_to_another_annotation() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        let b = annotation_at(90.0, 200.0);
        m.add_annotation(&a);
        let anchor = a.anchor().unwrap();
        m.annotations_by_anchor.0.insert(anchor, Rc::clone(&b));

        m.remove_annotation(&a);
        assert_eq!(a.anchor(), Some(anchor));
        assert_eq!(m.anchors(), &[anchor]);
        assert!(m.session().is_tracking(anchor));
        assert_eq!(m.annotations_by_anchor().get(&anchor), Some(&b));
        assert_eq!(
            m.diagnostics().last().map(Diagnostic::kind),
            Some(DiagnosticKind::InvariantViolation)
        );
    }

    #[test]
    fn removing_foreign_annotation_changes_nothing() {
        let mut m = manager();
        let mut other = manager();
        let a = annotation_at(0.0, 200.0);
        other.add_annotation(&a);

        m.remove_annotation(&a);
        assert_eq!(a.anchor(), other.anchors().first().copied());
        assert!(m.diagnostics().is_empty());
    }

    #[test]
    fn foreign_anchor_materialization_is_ignored() {
        let mut m = manager();
        let plane = TrackingAnchor::new(AnchorKind::Plane, Mat4::IDENTITY);
        m.session_mut().add_anchor(plane);
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);

        assert_eq!(m.pump(), 2);
        assert_eq!(m.annotations_by_node().len(), 1);
        assert_eq!(
            m.diagnostics().last(),
            Some(&Diagnostic::UnrecognizedAnchor { anchor: plane.id() })
        );
    }

    #[test]
    fn stale_placeholder_is_reported_not_bound() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        let mut scratch = World::new();
        let stale = scratch.spawn(VisualNode::empty());
        scratch.detach_from_parent(stale).unwrap();

        let before = m.scene().node_count();
        m.on_node_added(a.anchor().unwrap(), stale);
        assert!(m.annotations_by_node().is_empty());
        assert_eq!(m.scene().node_count(), before);
        assert!(matches!(
            m.diagnostics().last(),
            Some(Diagnostic::SceneRejected { .. })
        ));
    }

    #[test]
    fn hide_all_nodes_toggles_bound_nodes() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        let b = annotation_at(180.0, 200.0);
        m.add_annotations([&a, &b]);
        m.pump();
        assert_eq!(m.scene().drawables().len(), 2);

        m.hide_all_nodes(true);
        assert!(m.scene().drawables().is_empty());
        for node in m.annotations_by_node().keys() {
            assert_eq!(m.scene().is_hidden(*node), Some(true));
        }
        assert_eq!(m.annotations_by_node().len(), 2);

        m.hide_all_nodes(false);
        assert_eq!(m.scene().drawables().len(), 2);
    }

    #[test]
    fn bounds_changes_apply_to_later_placements_only() {
        let mut m = manager();
        let early = annotation_at(0.0, 1000.0);
        m.add_annotation(&early);

        m.set_anchor_distance_bounds(Some(10.0), Some(500.0)).unwrap();
        assert_eq!(
            m.anchor_distance_bounds(),
            DistanceBounds::new(10.0, 500.0).unwrap()
        );
        let late = annotation_at(0.0, 1000.0);
        m.add_annotation(&late);

        let dist = |a: &Rc<Annotation>| {
            let anchor = a.anchor().unwrap();
            m.session().anchor(anchor).unwrap().transform().translation().length()
        };
        assert!((dist(&early) - 250.0).abs() < 1e-6);
        assert!((dist(&late) - 500.0).abs() < 1e-6);
    }

    #[test]
    fn inverted_bounds_leave_configuration_unchanged() {
        let mut m = manager();
        let err = m.set_anchor_distance_bounds(Some(400.0), None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvertedBounds {
                min: 400.0,
                max: 250.0
            }
        );
        assert_eq!(m.anchor_distance_bounds(), DistanceBounds::default());
        assert!(m.set_anchor_distance_bounds(None, Some(f64::NAN)).is_err());
        assert_eq!(m.anchor_distance_bounds(), DistanceBounds::default());
    }

    #[test]
    fn remove_all_forgets_locations_and_releases_scene() {
        let mut m = manager();
        let annotations: Vec<_> = (0..3).map(|i| annotation_at(i as f64 * 90.0, 200.0)).collect();
        m.add_annotations(&annotations);
        m.pump();
        assert_eq!(m.annotations_by_node().len(), 3);

        m.remove_all_annotations();
        assert!(m.anchors().is_empty());
        assert!(m.annotations_by_anchor().is_empty());
        assert!(m.annotations_by_node().is_empty());
        for a in &annotations {
            assert_eq!(a.anchor(), None);
            assert_eq!(a.location(), None);
        }

        m.pump();
        let root = m.scene().root();
        assert_eq!(m.scene().subtree_len(root), 1);
    }

    #[test]
    fn into_parts_returns_collaborators() {
        let mut m = manager();
        let a = annotation_at(0.0, 200.0);
        m.add_annotation(&a);
        let (session, world, _) = m.into_parts();
        assert_eq!(session.tracked_count(), 1);
        assert_eq!(world.node_count(), 1);
        assert!(SceneGraph::contains(&world, world.root()));
    }
}
