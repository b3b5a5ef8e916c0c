//! Parsed feed selectors.

use scrollsafe_platform::Selector;
use scrollsafe_types::{FeedLayout, Result, ScrollSafeError};

/// [`FeedLayout`] with every selector parsed once up front.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    pub candidate: Selector,
    pub post_container: Selector,
    pub body: Selector,
    pub actor_container: Selector,
    pub actor_name: Selector,
    pub actor_description: Selector,
    pub actor_sub_description: Selector,
}

impl CompiledLayout {
    /// Parse every selector in `layout`.
    ///
    /// # Errors
    ///
    /// [`ScrollSafeError::ConfigInvalid`] naming the first field whose
    /// selector does not parse.
    pub fn compile(layout: &FeedLayout) -> Result<Self> {
        let parse = |name: &str, source: &str| {
            Selector::parse(source).map_err(|e| ScrollSafeError::ConfigInvalid {
                reason: format!("layout.{name}: {e}"),
            })
        };
        Ok(Self {
            candidate: parse("candidate", &layout.candidate)?,
            post_container: parse("post_container", &layout.post_container)?,
            body: parse("body", &layout.body)?,
            actor_container: parse("actor_container", &layout.actor_container)?,
            actor_name: parse("actor_name", &layout.actor_name)?,
            actor_description: parse("actor_description", &layout.actor_description)?,
            actor_sub_description: parse("actor_sub_description", &layout.actor_sub_description)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_compiles() {
        let layout = CompiledLayout::compile(&FeedLayout::default()).unwrap();
        assert_eq!(
            layout.candidate.as_str(),
            ".feed-shared-update-v2__control-menu-container"
        );
    }

    #[test]
    fn bad_selector_names_the_field() {
        let layout = FeedLayout {
            body: ".post >".into(),
            ..FeedLayout::default()
        };
        let err = CompiledLayout::compile(&layout).unwrap_err();
        assert!(err.to_string().contains("layout.body"));
    }

    #[test]
    fn configured_layouts_accept_full_css() {
        let layout = FeedLayout {
            candidate: "main > div[data-urn]:not(.ad)".into(),
            body: ".feed-item .text, .feed-item [data-role~=\"body\"]".into(),
            actor_name: ".actor span:first-child".into(),
            ..FeedLayout::default()
        };
        let compiled = CompiledLayout::compile(&layout).unwrap();
        assert_eq!(compiled.candidate.as_str(), "main > div[data-urn]:not(.ad)");
    }
}
