use foundation::ids::ElementId;

/// Failure reported by a page host (trigger registry or animation engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The element is no longer attached to the page.
    Detached(ElementId),
    Rejected { element: ElementId, reason: String },
}

impl HostError {
    pub fn rejected(element: ElementId, reason: impl Into<String>) -> Self {
        HostError::Rejected {
            element,
            reason: reason.into(),
        }
    }

    pub fn element(&self) -> ElementId {
        match self {
            HostError::Detached(id) => *id,
            HostError::Rejected { element, .. } => *element,
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::Detached(id) => write!(f, "element {id} is detached"),
            HostError::Rejected { element, reason } => {
                write!(f, "host rejected element {element}: {reason}")
            }
        }
    }
}

impl std::error::Error for HostError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// `scan` runs once per scheduler.
    AlreadyScanned,
    UnknownElement(ElementId),
    Host(HostError),
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealError::AlreadyScanned => write!(f, "reveal elements were already scanned"),
            RevealError::UnknownElement(id) => write!(f, "element {id} was never scanned"),
            RevealError::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for RevealError {
    fn from(err: HostError) -> Self {
        RevealError::Host(err)
    }
}
