use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::math::GeoCoordinate;
use tracking::AnchorId;

foundation::sequential_id! {
    /// Object identity of an [`Annotation`].
    pub struct AnnotationId;
}

/// A geo-tagged marker.
///
/// Annotations are shared between the caller and the manager as
/// `Rc<Annotation>`. The annotation only records *which* anchor it was placed
/// with; the anchor itself is owned by the tracking session. Equality is
/// identity: two annotations at the same location are still different markers.
#[derive(Debug)]
pub struct Annotation {
    id: AnnotationId,
    location: Cell<Option<GeoCoordinate>>,
    anchor: Cell<Option<AnchorId>>,
    title: Option<String>,
    properties: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(location: GeoCoordinate) -> Self {
        Self::with_location(Some(location))
    }

    /// An annotation whose location has not been provided yet.
    pub fn unlocated() -> Self {
        Self::with_location(None)
    }

    fn with_location(location: Option<GeoCoordinate>) -> Self {
        Self {
            id: AnnotationId::fresh(),
            location: Cell::new(location),
            anchor: Cell::new(None),
            title: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn location(&self) -> Option<GeoCoordinate> {
        self.location.get()
    }

    pub fn set_location(&self, location: Option<GeoCoordinate>) {
        self.location.set(location);
    }

    /// Anchor this annotation is currently placed with, if any.
    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor.get()
    }

    pub fn is_placed(&self) -> bool {
        self.anchor.get().is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub(crate) fn set_anchor(&self, anchor: Option<AnchorId>) {
        self.anchor.set(anchor);
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Annotation {}
