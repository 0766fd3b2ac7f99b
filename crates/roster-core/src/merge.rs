//! Document merger.
//!
//! Rewrites the inner content of every marker block in a document. Text
//! outside marker pairs, and the markers themselves, are copied unchanged.

use crate::entity::PoolSet;
use crate::error::{BlockError, MergeError};
use crate::parser::parse_entities;
use crate::resolver::resolve;
use crate::scanner::{Region, scan};
use crate::spec::parse_spec;
use crate::template::{Templates, render};

/// What happened to one marker block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// New content differs from the previous render.
    Updated { spec: String, entity_count: usize },
    /// New content is identical to the previous render.
    Unchanged { spec: String },
    /// Block left untouched because it could not be processed.
    Skipped { spec: String, error: BlockError },
}

impl BlockOutcome {
    #[must_use]
    pub fn spec(&self) -> &str {
        match self {
            Self::Updated { spec, .. } | Self::Unchanged { spec } | Self::Skipped { spec, .. } => {
                spec
            }
        }
    }
}

/// Result of merging a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    /// The updated document.
    pub document: String,
    /// One outcome per marker block, in document order.
    pub blocks: Vec<BlockOutcome>,
}

impl Merged {
    /// Whether any block's content changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, BlockOutcome::Updated { .. }))
    }

    /// Blocks that were left untouched because of an error.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &BlockError)> {
        self.blocks.iter().filter_map(|block| match block {
            BlockOutcome::Skipped { spec, error } => Some((spec.as_str(), error)),
            _ => None,
        })
    }
}

/// Merges fresh pools into documents.
///
/// # Example
///
/// ```
/// use roster_core::{Entity, Merger, PoolSet, Templates};
///
/// let pools = PoolSet {
///     contributors: vec![Entity::new("octocat").with_name("Mona")],
///     ..PoolSet::default()
/// };
/// let templates = Templates::default();
/// let merger = Merger::new(&pools, &templates);
///
/// let readme = "<!-- readme: contributors -start -->\n<!-- readme: contributors -end -->";
/// let merged = merger.merge(readme).unwrap();
///
/// assert!(merged.is_changed());
/// assert!(merged.document.contains("<sub><b>Mona</b></sub>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Merger<'a> {
    pools: &'a PoolSet,
    templates: &'a Templates,
}

impl<'a> Merger<'a> {
    #[must_use]
    pub fn new(pools: &'a PoolSet, templates: &'a Templates) -> Self {
        Self { pools, templates }
    }

    /// Re-render every marker block in `document`.
    ///
    /// Blocks are processed in document order and independently: a block that
    /// cannot be processed keeps its previous content.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::NoMarkers`] when the document has no marker
    /// pairs. Callers should treat this as "nothing to update".
    pub fn merge(&self, document: &str) -> Result<Merged, MergeError> {
        let regions = scan(document);
        if regions.is_empty() {
            return Err(MergeError::NoMarkers);
        }

        let mut output = String::with_capacity(document.len());
        let mut blocks = Vec::with_capacity(regions.len());
        let mut cursor = 0;

        for region in &regions {
            let previous = region.content(document);
            output.push_str(&document[cursor..region.inner.start]);

            match self.render_block(region, previous) {
                Ok((content, entity_count)) => {
                    output.push_str(&content);
                    blocks.push(if content == previous {
                        BlockOutcome::Unchanged {
                            spec: region.spec.to_owned(),
                        }
                    } else {
                        BlockOutcome::Updated {
                            spec: region.spec.to_owned(),
                            entity_count,
                        }
                    });
                }
                Err(error) => {
                    tracing::debug!(spec = region.spec, error = %error, "Skipping readme block");
                    output.push_str(previous);
                    blocks.push(BlockOutcome::Skipped {
                        spec: region.spec.to_owned(),
                        error,
                    });
                }
            }

            cursor = region.inner.end;
        }
        output.push_str(&document[cursor..]);

        let merged = Merged {
            document: output,
            blocks,
        };
        tracing::info!(
            blocks = merged.blocks.len(),
            changed = merged.is_changed(),
            "Merged readme blocks"
        );
        Ok(merged)
    }

    /// Render new content for one block. Returns the content and entity count.
    fn render_block(
        &self,
        region: &Region<'_>,
        previous: &str,
    ) -> Result<(String, usize), BlockError> {
        let tokens = parse_spec(region.spec)?;
        let prior = parse_entities(previous);
        let entities = resolve(&tokens, &prior, self.pools);
        let template = self.templates.for_spec(region.spec);
        Ok((render(entities.as_slice(), template), entities.len()))
    }
}

/// Merge `pools` into `document` using `templates`.
///
/// Shorthand for [`Merger::merge`].
///
/// # Errors
///
/// Returns [`MergeError::NoMarkers`] when the document has no marker pairs.
pub fn merge(
    document: &str,
    pools: &PoolSet,
    templates: &Templates,
) -> Result<Merged, MergeError> {
    Merger::new(pools, templates).merge(document)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entity::Entity;
    use crate::error::SpecError;
    use crate::parser::parse_entity_list;
    use crate::template::Template;

    fn pools() -> PoolSet {
        PoolSet {
            contributors: vec![
                Entity::new("a").with_avatar_url("https://example.com/a.png"),
                Entity::new("b").with_name("Bee"),
            ],
            collaborators: vec![],
            bots: vec![Entity::bot("ci-bot")],
            sponsors: vec![Entity::new("s").with_name("Sponsor")],
        }
    }

    fn block(spec: &str, inner: &str) -> String {
        format!("<!-- readme: {spec} -start -->{inner}<!-- readme: {spec} -end -->")
    }

    fn logins_in(document: &str) -> Vec<String> {
        let regions = scan(document);
        parse_entity_list(regions[0].content(document))
            .into_iter()
            .map(|e| e.login)
            .collect()
    }

    #[test]
    fn test_no_markers() {
        let templates = Templates::default();
        let result = merge("# Readme\n\nNothing here.\n", &pools(), &templates);
        assert_eq!(result, Err(MergeError::NoMarkers));
    }

    #[test]
    fn test_merge_preserves_surroundings_and_markers() {
        let templates = Templates::default();
        let doc = format!("# Title\n\n{}\n\nFooter\n", block("contributors", "\nold\n"));
        let merged = merge(&doc, &pools(), &templates).unwrap();

        assert!(merged.document.starts_with("# Title\n\n<!-- readme: contributors -start -->\n<table>"));
        assert!(merged.document.ends_with("</table>\n<!-- readme: contributors -end -->\n\nFooter\n"));
        assert!(!merged.document.contains("old"));
        assert_eq!(
            merged.blocks,
            vec![BlockOutcome::Updated {
                spec: "contributors".to_owned(),
                entity_count: 2,
            }]
        );
        assert!(merged.is_changed());
    }

    #[test]
    fn test_order_preservation() {
        let templates = Templates::default();
        let merged = merge(&block("contributors,bots", ""), &pools(), &templates).unwrap();
        assert_eq!(logins_in(&merged.document), vec!["a", "b", "ci-bot"]);
    }

    #[test]
    fn test_removal() {
        let templates = Templates::default();
        let merged = merge(&block("contributors,b/-", ""), &pools(), &templates).unwrap();
        assert_eq!(logins_in(&merged.document), vec!["a"]);
    }

    #[test]
    fn test_idempotent() {
        let templates = Templates::default();
        let doc = format!(
            "intro\n{}\nmid\n{}\n",
            block("contributors,bots,carol", ""),
            block("sponsors", "\nstale\n")
        );
        let once = merge(&doc, &pools(), &templates).unwrap();
        let twice = merge(&once.document, &pools(), &templates).unwrap();

        assert_eq!(twice.document, once.document);
        assert!(!twice.is_changed());
        assert!(
            twice
                .blocks
                .iter()
                .all(|b| matches!(b, BlockOutcome::Unchanged { .. }))
        );
    }

    #[test]
    fn test_prior_metadata_preserved_for_literal() {
        let templates = Templates::default();
        let old = render(
            &[Entity::new("bob")
                .with_name("Bob")
                .with_avatar_url("https://example.com/bob.png")],
            &Template::default(),
        );
        let doc = block("bob", &old);
        let merged = merge(&doc, &PoolSet::default(), &templates).unwrap();

        assert_eq!(merged.document, doc);
        assert!(!merged.is_changed());
        let entities = parse_entity_list(&merged.document);
        assert_eq!(entities[0].name.as_deref(), Some("Bob"));
        assert_eq!(
            entities[0].avatar_url.as_deref(),
            Some("https://example.com/bob.png")
        );
    }

    #[test]
    fn test_fresh_pool_data_replaces_bare_render() {
        let templates = Templates::default();
        let bare = merge(&block("bob", ""), &PoolSet::default(), &templates).unwrap();

        let pools = PoolSet {
            contributors: vec![
                Entity::new("bob")
                    .with_name("Bob Builder")
                    .with_avatar_url("https://example.com/bob.png"),
            ],
            ..PoolSet::default()
        };
        let merged = merge(&bare.document, &pools, &templates).unwrap();

        assert!(merged.is_changed());
        let entities = parse_entity_list(&merged.document);
        assert_eq!(entities[0].name.as_deref(), Some("Bob Builder"));
        assert_eq!(
            entities[0].avatar_url.as_deref(),
            Some("https://example.com/bob.png")
        );
    }

    #[test]
    fn test_use_username_keeps_literal_name() {
        let templates = Templates::new(Template {
            use_username: true,
            ..Template::default()
        });
        let old = render(
            &[Entity::new("bob").with_name("Bob Builder")],
            &Template::default(),
        );
        let first = merge(&block("bob", &old), &PoolSet::default(), &templates).unwrap();
        assert!(first.is_changed());

        let second = merge(&first.document, &PoolSet::default(), &templates).unwrap();
        assert_eq!(second.document, first.document);
        let entities = parse_entity_list(&second.document);
        assert_eq!(entities[0].name.as_deref(), Some("Bob Builder"));
    }

    #[test]
    fn test_blocks_are_independent() {
        let templates = Templates::default();
        let doc = format!("{}\n---\n{}", block("sponsors", ""), block("bots", ""));
        let first = merge(&doc, &pools(), &templates).unwrap();

        let mut changed = pools();
        changed.sponsors.push(Entity::new("new-sponsor"));
        let second = merge(&first.document, &changed, &templates).unwrap();

        let bots_block = |document: &str| scan(document)[1].content(document).to_owned();
        assert_eq!(bots_block(&second.document), bots_block(&first.document));
        assert!(matches!(second.blocks[0], BlockOutcome::Updated { .. }));
        assert!(matches!(second.blocks[1], BlockOutcome::Unchanged { .. }));
    }

    #[test]
    fn test_blank_spec_block_is_skipped() {
        let templates = Templates::default();
        let doc = format!(
            "<!-- readme:  -start -->keep me<!-- readme:  -end -->\n{}",
            block("bots", "")
        );
        let merged = merge(&doc, &pools(), &templates).unwrap();

        assert!(merged.document.starts_with("<!-- readme:  -start -->keep me<!-- readme:  -end -->\n"));
        assert_eq!(
            merged.skipped().collect::<Vec<_>>(),
            vec![("", &BlockError::Spec(SpecError::Empty))]
        );
        assert!(matches!(merged.blocks[1], BlockOutcome::Updated { .. }));
    }

    #[test]
    fn test_template_keyed_by_spec() {
        let templates = Templates::default().with_block(
            "contributors",
            Template {
                image_size: 42,
                ..Template::default()
            },
        );
        let doc = format!("{}\n{}", block("contributors", ""), block("bots", ""));
        let merged = merge(&doc, &pools(), &templates).unwrap();
        let regions = scan(&merged.document);

        assert!(regions[0].content(&merged.document).contains(r#"width="42;""#));
        assert!(regions[1].content(&merged.document).contains(r#"width="100;""#));
    }

    #[test]
    fn test_empty_pool_renders_empty_table() {
        let templates = Templates::default();
        let merged = merge(&block("collaborators", "x"), &pools(), &templates).unwrap();
        assert_eq!(
            merged.document,
            block("collaborators", "\n<table>\n\t<tbody>\n\t</tbody>\n</table>\n")
        );
    }
}
