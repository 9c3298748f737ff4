/// Coordinate spaces a session can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceType {
    /// World-stable, origin near the viewer's position at session start.
    Local,
    /// Head-locked, moves with the viewer.
    Viewer,
}

/// Handle to a reference space issued by one session.
///
/// Immutable once obtained. Becomes meaningless when the issuing session
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSpace {
    id: u32,
    kind: ReferenceSpaceType,
}

impl ReferenceSpace {
    pub fn new(id: u32, kind: ReferenceSpaceType) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> ReferenceSpaceType {
        self.kind
    }
}

/// Standing hit-test subscription: a ray along the forward axis of `space`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTestSource {
    id: u32,
    space: ReferenceSpace,
}

impl HitTestSource {
    pub fn new(id: u32, space: ReferenceSpace) -> Self {
        Self { id, space }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Space the ray is anchored to.
    pub fn space(&self) -> ReferenceSpace {
        self.space
    }
}
