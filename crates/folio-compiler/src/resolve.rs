//! Resolution of raw invocations against the component registry.

use std::collections::BTreeMap;

use folio_frontmatter::{DateValue, Metadata};

use crate::component::{
    CalloutKind, Component, ComponentKind, Enumerated, HighlightColor, TitleBlock, VideoPlayer,
    Visibility,
};
use crate::error::CompileError;
use crate::options::AttributePolicy;
use crate::syntax::{Invocation, InvocationArgs, RawHeading, RawNode};
use crate::text::plain_text;
use crate::tree::{ComponentNode, Heading, Node, Placement};

/// Label used by a demo button without content.
pub(crate) const DEFAULT_DEMO_LABEL: &str = "Go to demo";

/// Turns the raw tree into resolved nodes, validating every component.
pub(crate) struct Resolver<'a> {
    metadata: &'a Metadata,
    policy: AttributePolicy,
    warnings: Vec<String>,
    video_players: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(metadata: &'a Metadata, policy: AttributePolicy) -> Self {
        Self {
            metadata,
            policy,
            warnings: Vec::new(),
            video_players: 0,
        }
    }

    /// Number of video players resolved so far.
    pub(crate) fn video_players(&self) -> usize {
        self.video_players
    }

    pub(crate) fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    pub(crate) fn resolve(&mut self, raw: Vec<RawNode>) -> Result<Vec<Node>, CompileError> {
        raw.into_iter()
            .map(|node| match node {
                RawNode::Markup(text) => Ok(Node::Markup(text)),
                RawNode::Heading(heading) => self.heading(heading).map(Node::Heading),
                RawNode::Invocation(invocation) => self.invocation(invocation).map(Node::Component),
            })
            .collect()
    }

    fn heading(&mut self, raw: RawHeading) -> Result<Heading, CompileError> {
        let children = self.resolve(raw.children)?;
        let label = plain_text(&children);
        let explicit_id = raw.explicit_id.is_some();
        Ok(Heading {
            level: raw.level,
            // Derived ids are assigned once every explicit id is known.
            id: raw.explicit_id.unwrap_or_default(),
            explicit_id,
            classes: raw.classes,
            label,
            children,
            line: raw.line,
        })
    }

    fn invocation(&mut self, raw: Invocation) -> Result<ComponentNode, CompileError> {
        let line = raw.line;
        let kind = ComponentKind::from_name(&raw.name).ok_or_else(|| CompileError::UnknownComponent {
            name: raw.name.clone(),
            line,
        })?;
        if kind.block_only() && raw.placement == Placement::Inline {
            return Err(CompileError::UnexpectedPlacement { component: kind, line });
        }
        check_attribute_names(kind, &raw.args, line)?;

        let mut children = self.resolve(raw.children)?;
        if !kind.accepts_children() && has_content(&children) {
            return Err(CompileError::UnexpectedChildren {
                component: kind,
                line,
            });
        }

        let args = &raw.args;
        let component = match kind {
            ComponentKind::Highlight => Component::Highlight {
                color: self.enumerated::<HighlightColor>(kind, "color", args.get("color"), line)?,
            },
            ComponentKind::Callout => Component::Callout {
                kind: self.enumerated::<CalloutKind>(kind, "type", args.get("type"), line)?,
            },
            ComponentKind::Anchor => self.anchor(args, &children, line)?,
            ComponentKind::TitleSection => Component::TitleSection(self.title_block(args)),
            ComponentKind::VideoPlayer => Component::VideoPlayer(self.video_player(args, line)?),
            ComponentKind::ImageStack => Component::ImageStack,
            ComponentKind::DemoButton => {
                let href = required(kind, args, "href", line)?;
                if !has_content(&children) {
                    children = vec![Node::Markup(DEFAULT_DEMO_LABEL.to_owned())];
                }
                Component::DemoButton { href }
            }
        };

        Ok(ComponentNode {
            component,
            placement: raw.placement,
            children,
            line,
        })
    }

    /// Validate an enumerated attribute, falling back to the default under the
    /// lenient policy.
    fn enumerated<T: Enumerated>(
        &mut self,
        component: ComponentKind,
        attribute: &'static str,
        value: Option<&str>,
        line: usize,
    ) -> Result<T, CompileError> {
        let Some(raw) = value else {
            return Ok(T::default());
        };
        if let Some(parsed) = T::parse(raw) {
            return Ok(parsed);
        }

        match self.policy {
            AttributePolicy::Strict => Err(CompileError::InvalidAttribute {
                component,
                attribute,
                value: raw.to_owned(),
                expected: T::expected(),
                line,
            }),
            AttributePolicy::Lenient => {
                let fallback = T::default().as_str();
                tracing::warn!(
                    %component,
                    attribute,
                    value = raw,
                    fallback,
                    line,
                    "Invalid attribute value, using default"
                );
                self.warnings.push(format!(
                    "line {line}: invalid {component} {attribute}=\"{raw}\", using \"{fallback}\""
                ));
                Ok(T::default())
            }
        }
    }

    fn anchor(&mut self, args: &InvocationArgs, children: &[Node], line: usize) -> Result<Component, CompileError> {
        if let (Some(shorthand), Some(attribute)) = (args.id.as_deref(), args.get("id"))
            && shorthand.trim() != attribute.trim()
        {
            return Err(CompileError::InvalidAttribute {
                component: ComponentKind::Anchor,
                attribute: "id",
                value: attribute.to_owned(),
                expected: format!("a single identifier, `#{shorthand}` is also given"),
                line,
            });
        }
        let id = args
            .id
            .as_deref()
            .or_else(|| args.get("id"))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(CompileError::MissingAttribute {
                component: ComponentKind::Anchor,
                attribute: "id",
                line,
            })?;
        if id.contains(char::is_whitespace) {
            return Err(CompileError::InvalidAttribute {
                component: ComponentKind::Anchor,
                attribute: "id",
                value: id.to_owned(),
                expected: "an identifier without whitespace".to_owned(),
                line,
            });
        }

        let visible = self.enumerated::<Visibility>(ComponentKind::Anchor, "visible", args.get("visible"), line)?;
        let label = args
            .get("title")
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_owned)
            .or_else(|| Some(plain_text(children)).filter(|text| !text.is_empty()))
            .unwrap_or_else(|| id.to_owned());

        Ok(Component::Anchor {
            id: id.to_owned(),
            label,
            visible: visible.0,
        })
    }

    fn title_block(&self, args: &InvocationArgs) -> TitleBlock {
        let meta = self.metadata;
        let text = |key: &str, fallback: Option<&str>| {
            args.get(key)
                .or(fallback)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        let date = |key: &str, fallback: Option<&DateValue>| {
            args.get(key).map(DateValue::parse).or_else(|| fallback.cloned())
        };

        let merged = Metadata {
            title: text("title", meta.title.as_deref()),
            subtitle: text("subtitle", meta.subtitle.as_deref()),
            published: date("published", meta.published.as_ref()),
            date: date("date", meta.date.as_ref()),
            year: date("year", meta.year.as_ref()),
            location: text("location", meta.location.as_deref()),
            extra: BTreeMap::new(),
        };

        TitleBlock {
            date: merged.effective_date().cloned(),
            title: merged.title,
            subtitle: merged.subtitle,
            location: merged.location,
        }
    }

    fn video_player(&mut self, args: &InvocationArgs, line: usize) -> Result<VideoPlayer, CompileError> {
        let kind = ComponentKind::VideoPlayer;
        let player = VideoPlayer {
            index: self.video_players,
            width: required(kind, args, "width", line)?,
            height: required(kind, args, "height", line)?,
            video_url: required(kind, args, "videoUrl", line)?,
            fallback_url: required(kind, args, "gifUrl", line)?,
        };
        self.video_players += 1;
        Ok(player)
    }
}

/// Reject attributes, ids and classes outside the kind's contract.
fn check_attribute_names(kind: ComponentKind, args: &InvocationArgs, line: usize) -> Result<(), CompileError> {
    let accepted = kind.attributes();
    for name in args.names() {
        let allowed = if name.starts_with('#') {
            kind == ComponentKind::Anchor
        } else {
            !name.starts_with('.') && accepted.contains(&name.as_str())
        };
        if !allowed {
            return Err(CompileError::UnexpectedAttribute {
                component: kind,
                attribute: name,
                line,
            });
        }
    }
    Ok(())
}

fn required(
    component: ComponentKind,
    args: &InvocationArgs,
    attribute: &'static str,
    line: usize,
) -> Result<String, CompileError> {
    args.get(attribute)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(CompileError::MissingAttribute {
            component,
            attribute,
            line,
        })
}

/// Whether nodes hold anything besides whitespace.
fn has_content(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Markup(text) => !text.trim().is_empty(),
        Node::Heading(_) | Node::Component(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::syntax::parse;

    fn resolve(body: &str) -> Result<Vec<Node>, CompileError> {
        resolve_with(body, &Metadata::default(), AttributePolicy::Strict)
    }

    fn resolve_with(body: &str, metadata: &Metadata, policy: AttributePolicy) -> Result<Vec<Node>, CompileError> {
        let raw = parse(body, 1)?;
        Resolver::new(metadata, policy).resolve(raw)
    }

    fn component(node: &Node) -> &ComponentNode {
        match node {
            Node::Component(component) => component,
            other => panic!("expected component, got {other:?}"),
        }
    }

    #[test]
    fn test_highlight_default_color() {
        let nodes = resolve(":Highlight[x]").unwrap();
        assert_eq!(
            component(&nodes[0]).component,
            Component::Highlight {
                color: HighlightColor::Yellow
            }
        );
    }

    #[test]
    fn test_highlight_invalid_color_strict() {
        let err = resolve("a :Highlight[x]{color=purple}").unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidAttribute {
                component: ComponentKind::Highlight,
                attribute: "color",
                ref value,
                line: 1,
                ..
            } if value == "purple"
        ));
    }

    #[test]
    fn test_highlight_invalid_color_lenient() {
        let raw = parse(":Highlight[x]{color=purple}", 1).unwrap();
        let metadata = Metadata::default();
        let mut resolver = Resolver::new(&metadata, AttributePolicy::Lenient);
        let nodes = resolver.resolve(raw).unwrap();
        assert_eq!(
            component(&nodes[0]).component,
            Component::Highlight {
                color: HighlightColor::Yellow
            }
        );
        let warnings = resolver.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("purple"), "{warnings:?}");
    }

    #[test]
    fn test_unknown_component() {
        let err = resolve("::Carousel").unwrap_err();
        assert!(matches!(err, CompileError::UnknownComponent { ref name, line: 1 } if name == "Carousel"));
    }

    #[test]
    fn test_unexpected_attribute() {
        let err = resolve(":Highlight[x]{size=2}").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedAttribute { ref attribute, .. } if attribute == "size"));

        let err = resolve(":Highlight[x]{.big}").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedAttribute { ref attribute, .. } if attribute == ".big"));

        let err = resolve(":Highlight[x]{#id}").unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedAttribute { ref attribute, .. } if attribute == "#id"));
    }

    #[test]
    fn test_callout_container() {
        let nodes = resolve(":::Callout{type=success}\nDone!\n:::\n").unwrap();
        let callout = component(&nodes[0]);
        assert_eq!(
            callout.component,
            Component::Callout {
                kind: CalloutKind::Success
            }
        );
        assert_eq!(callout.children, vec![Node::Markup("Done!\n".to_owned())]);
    }

    #[test]
    fn test_anchor_shorthand_and_attribute() {
        let nodes = resolve("::Anchor{#intro visible=false}\n::Anchor[Setup]{id=setup}\n").unwrap();
        assert_eq!(
            component(&nodes[0]).component,
            Component::Anchor {
                id: "intro".to_owned(),
                label: "intro".to_owned(),
                visible: false
            }
        );
        assert_eq!(
            component(&nodes[1]).component,
            Component::Anchor {
                id: "setup".to_owned(),
                label: "Setup".to_owned(),
                visible: true
            }
        );
    }

    #[test]
    fn test_anchor_conflicting_ids() {
        let err = resolve("::Anchor{#a id=b}").unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidAttribute {
                component: ComponentKind::Anchor,
                attribute: "id",
                ref value,
                line: 1,
                ..
            } if value == "b"
        ));

        let nodes = resolve("::Anchor{#a id=a}").unwrap();
        assert!(matches!(&component(&nodes[0]).component, Component::Anchor { id, .. } if id == "a"));
    }

    #[test]
    fn test_anchor_title_wins() {
        let nodes = resolve("::Anchor[ignored]{#a title=\"Results\"}").unwrap();
        assert!(matches!(
            &component(&nodes[0]).component,
            Component::Anchor { label, .. } if label == "Results"
        ));
    }

    #[test]
    fn test_anchor_requires_id() {
        let err = resolve("::Anchor[Label]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingAttribute {
                component: ComponentKind::Anchor,
                attribute: "id",
                ..
            }
        ));
    }

    #[test]
    fn test_anchor_invalid_visible() {
        let err = resolve("::Anchor{#a visible=maybe}").unwrap_err();
        assert!(matches!(err, CompileError::InvalidAttribute { attribute: "visible", .. }));
    }

    #[test]
    fn test_title_section_from_metadata() {
        let metadata = Metadata::from_yaml("title: Case Study\ndate: 2024-03-04").unwrap();
        let nodes = resolve_with("::TitleSection", &metadata, AttributePolicy::Strict).unwrap();
        let Component::TitleSection(block) = &component(&nodes[0]).component else {
            panic!("expected title section");
        };
        assert_eq!(block.title.as_deref(), Some("Case Study"));
        assert_eq!(block.date.as_ref().map(ToString::to_string).as_deref(), Some("March 4, 2024"));
        assert!(block.subtitle.is_none());
    }

    #[test]
    fn test_title_section_overrides() {
        let metadata = Metadata::from_yaml("title: Old\nyear: 2020").unwrap();
        let nodes = resolve_with(
            "::TitleSection{title=\"New\" published=2024-01-02}",
            &metadata,
            AttributePolicy::Strict,
        )
        .unwrap();
        let Component::TitleSection(block) = &component(&nodes[0]).component else {
            panic!("expected title section");
        };
        assert_eq!(block.title.as_deref(), Some("New"));
        assert_eq!(block.date.as_ref().map(ToString::to_string).as_deref(), Some("January 2, 2024"));
    }

    #[test]
    fn test_title_section_rejects_children() {
        let err = resolve("::TitleSection[text]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnexpectedChildren {
                component: ComponentKind::TitleSection,
                ..
            }
        ));
    }

    #[test]
    fn test_video_players_are_indexed() {
        let body = "::VideoPlayer{width=640 height=360 videoUrl=/a.mp4 gifUrl=/a.gif}\n\
                    ::VideoPlayer{width=1 height=1 videoUrl=/b.mp4 gifUrl=/b.gif}\n";
        let raw = parse(body, 1).unwrap();
        let metadata = Metadata::default();
        let mut resolver = Resolver::new(&metadata, AttributePolicy::Strict);
        let nodes = resolver.resolve(raw).unwrap();
        assert_eq!(resolver.video_players(), 2);
        let Component::VideoPlayer(second) = &component(&nodes[1]).component else {
            panic!("expected video player");
        };
        assert_eq!(second.index, 1);
        assert_eq!(second.fallback_url, "/b.gif");
    }

    #[test]
    fn test_block_only_components_reject_inline_placement() {
        let err = resolve("Watch :VideoPlayer{width=1 height=1 videoUrl=/a.mp4 gifUrl=/a.gif} now").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnexpectedPlacement {
                component: ComponentKind::VideoPlayer,
                line: 1
            }
        ));

        let err = resolve("intro\n:TitleSection{title=X}\n").unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnexpectedPlacement {
                component: ComponentKind::TitleSection,
                line: 2
            }
        ));
    }

    #[test]
    fn test_video_player_missing_source() {
        let err = resolve("::VideoPlayer{width=640 height=360 videoUrl=/a.mp4}").unwrap_err();
        assert!(matches!(err, CompileError::MissingAttribute { attribute: "gifUrl", .. }));
    }

    #[test]
    fn test_demo_button_default_label() {
        let nodes = resolve("::DemoButton{href=/demos/arboretum}").unwrap();
        let button = component(&nodes[0]);
        assert_eq!(button.children, vec![Node::Markup(DEFAULT_DEMO_LABEL.to_owned())]);
    }

    #[test]
    fn test_demo_button_requires_href() {
        let err = resolve(":DemoButton[Open]").unwrap_err();
        assert!(matches!(err, CompileError::MissingAttribute { attribute: "href", .. }));
    }

    #[test]
    fn test_heading_label_includes_component_text() {
        let nodes = resolve("## Using :Highlight[colors] well {#colors}").unwrap();
        let Node::Heading(heading) = &nodes[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.label, "Using colors well");
        assert_eq!(heading.id, "colors");
        assert!(heading.explicit_id);
    }
}
