/// Marker attribute selecting the animation kind. Its presence opts an element in.
pub const ATTR_KIND: &str = "data-anim";
pub const ATTR_DURATION: &str = "data-anim-duration";
pub const ATTR_DELAY: &str = "data-anim-delay";
pub const ATTR_GROUP_DELAY: &str = "data-anim-group-delay";

/// Raw attribute strings exactly as found in markup.
///
/// Parsing happens later in [`crate::params::RevealParams::derive`], so hosts
/// never have to interpret values themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RawAttributes {
    pub kind: Option<String>,
    pub duration: Option<String>,
    pub delay: Option<String>,
    pub group_delay: Option<String>,
}

impl RawAttributes {
    /// Builds the attribute set from a host lookup such as `Element::get_attribute`.
    pub fn from_lookup(mut get: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            kind: get(ATTR_KIND),
            duration: get(ATTR_DURATION),
            delay: get(ATTR_DELAY),
            group_delay: get(ATTR_GROUP_DELAY),
        }
    }

    pub fn with_kind(kind: &str) -> Self {
        Self {
            kind: Some(kind.to_string()),
            ..Self::default()
        }
    }

    pub fn duration(mut self, raw: &str) -> Self {
        self.duration = Some(raw.to_string());
        self
    }

    pub fn delay(mut self, raw: &str) -> Self {
        self.delay = Some(raw.to_string());
        self
    }

    pub fn group_delay(mut self, raw: &str) -> Self {
        self.group_delay = Some(raw.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_all_four_attributes_through_lookup() {
        let markup: HashMap<&str, &str> = [
            (ATTR_KIND, "fadeslide-up"),
            (ATTR_DURATION, "0.8"),
            (ATTR_GROUP_DELAY, "150"),
        ]
        .into_iter()
        .collect();

        let attrs = RawAttributes::from_lookup(|name| markup.get(name).map(|v| v.to_string()));
        assert_eq!(
            attrs,
            RawAttributes::with_kind("fadeslide-up")
                .duration("0.8")
                .group_delay("150")
        );
        assert_eq!(attrs.delay, None);
    }
}
