//! Entity reverse-parser.
//!
//! Reads entities back out of a previously rendered block so that names and
//! avatars survive for logins that are no longer in the fresh pools.

use std::collections::HashMap;
use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use crate::entity::{Entity, EntityKind, PriorEntity};

/// Matches one rendered cell: profile link, avatar image and caption.
static CELL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<a href="https://github\.com/(?P<login>[^"]*)">\s*"#,
        r#"<img src="(?P<avatar>[^"]*)"(?P<attrs>(?:[^>"]|"[^"]*")*?)/?>\s*"#,
        r"<br\s*/?>\s*",
        r"<sub><b>(?P<name>[\s\S]*?)</b></sub>\s*</a>",
    ))
    .expect("invalid cell regex")
});

/// Display name carried on the image when the caption shows the login.
static TITLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\btitle="(?P<title>[^"]*)""#).expect("invalid title attribute regex")
});

/// Prior metadata keyed by login.
pub type PriorEntities = HashMap<String, PriorEntity>;

/// Entities in a rendered block, in document order.
///
/// Content that does not contain rendered cells yields an empty list.
#[must_use]
pub fn parse_entity_list(content: &str) -> Vec<Entity> {
    CELL_PATTERN
        .captures_iter(content)
        .map(|caps| {
            let field = |name: &str| {
                caps.name(name)
                    .map(|m| decode_html_entities(m.as_str()).into_owned())
                    .unwrap_or_default()
            };
            let title = caps
                .name("attrs")
                .and_then(|attrs| TITLE_ATTR.captures(attrs.as_str()))
                .and_then(|title| title.name("title"))
                .map(|m| decode_html_entities(m.as_str()).into_owned());
            Entity {
                login: field("login"),
                name: non_empty(title.unwrap_or_else(|| field("name"))),
                avatar_url: non_empty(field("avatar")),
                kind: EntityKind::Person,
            }
        })
        .collect()
}

/// Prior metadata for every login in a rendered block.
///
/// When a login appears more than once, the first occurrence wins.
#[must_use]
pub fn parse_entities(content: &str) -> PriorEntities {
    let mut prior = PriorEntities::new();
    for entity in parse_entity_list(content) {
        prior.entry(entity.login).or_insert(PriorEntity {
            name: entity.name,
            avatar_url: entity.avatar_url,
        });
    }
    prior
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Template, render};

    const CELL: &str = r#"
<table>
	<tbody>
		<tr>
			<td align="center">
				<a href="https://github.com/bob">
					<img src="https://avatars.example.com/u/2?v=4" width="100;" alt="bob"/>
					<br />
					<sub><b>Bob Builder</b></sub>
				</a>
			</td>
		</tr>
	</tbody>
</table>
"#;

    #[test]
    fn test_parse_rendered_cell() {
        let prior = parse_entities(CELL);
        assert_eq!(prior.len(), 1);
        assert_eq!(
            prior.get("bob"),
            Some(&PriorEntity {
                name: Some("Bob Builder".to_owned()),
                avatar_url: Some("https://avatars.example.com/u/2?v=4".to_owned()),
            })
        );
    }

    #[test]
    fn test_parse_compact_markup() {
        let html = r#"<a href="https://github.com/al"><img src="x.png" alt="al"><br><sub><b>Al</b></sub></a>"#;
        let entities = parse_entity_list(html);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].login, "al");
        assert_eq!(entities[0].avatar_url.as_deref(), Some("x.png"));
        assert_eq!(entities[0].name.as_deref(), Some("Al"));
    }

    #[test]
    fn test_parse_empty_or_unrelated_content() {
        assert!(parse_entities("").is_empty());
        assert!(parse_entities("\n").is_empty());
        assert!(parse_entities("some *markdown* [link](https://github.com/x)").is_empty());
    }

    #[test]
    fn test_parse_first_occurrence_wins() {
        let entities = [
            Entity::new("dup").with_name("First"),
            Entity::new("dup").with_name("Second"),
        ];
        let html = render(&entities, &Template::default());
        assert_eq!(parse_entity_list(&html).len(), 2);
        let prior = parse_entities(&html);
        assert_eq!(prior["dup"].name.as_deref(), Some("First"));
    }

    #[test]
    fn test_round_trip() {
        let entities = vec![
            Entity::new("alice")
                .with_name("Alice <A&B>")
                .with_avatar_url("https://example.com/a.png?s=100&v=4"),
            Entity::new("bob").with_name("Bob"),
            Entity::new("ci-bot").with_avatar_url("https://example.com/bot.png"),
            Entity::new("Case\"Login"),
        ];
        for use_username in [false, true] {
            let template = Template {
                columns_per_row: 3,
                use_username,
                ..Template::default()
            };
            let parsed = parse_entity_list(&render(&entities, &template));

            assert_eq!(parsed.len(), entities.len());
            for (original, recovered) in entities.iter().zip(&parsed) {
                assert_eq!(recovered.login, original.login);
                if original.name.is_some() {
                    assert_eq!(recovered.name, original.name, "use_username={use_username}");
                }
                if original.avatar_url.is_some() {
                    assert_eq!(recovered.avatar_url, original.avatar_url);
                }
            }
            assert_eq!(
                parsed[3].avatar_url.as_deref(),
                Some("https://github.com/Case\"Login.png?size=100")
            );
        }
    }

    #[test]
    fn test_parse_title_attribute_overrides_caption() {
        let html = r#"<a href="https://github.com/bob"><img src="b.png" width="100;" alt="bob" title="Bob &amp; Co"/><br /><sub><b>bob</b></sub></a>"#;
        let entities = parse_entity_list(html);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name.as_deref(), Some("Bob & Co"));
    }
}
