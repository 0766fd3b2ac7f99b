//! Block renderer.
//!
//! Renders an ordered entity sequence as an HTML table, one cell per entity:
//!
//! ```text
//! <td align="center">
//!     <a href="https://github.com/<login>">
//!         <img src="<avatar>" width="<size>;" alt="<login>"/>
//!         <br />
//!         <sub><b><caption></b></sub>
//!     </a>
//! </td>
//! ```
//!
//! When captions show the login, a display name travels in a `title`
//! attribute on the image instead. The markup is the exact input format of
//! [`crate::parser`], so a rendered block can always be read back.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::entity::Entity;

/// Base URL for profile links and placeholder avatars.
pub(crate) const PROFILE_BASE_URL: &str = "https://github.com/";

/// Default number of cells per table row.
pub const DEFAULT_COLUMNS_PER_ROW: usize = 6;

/// Default avatar width in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 100;

/// Rendering parameters for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Cells per table row.
    pub columns_per_row: usize,
    /// Avatar width in pixels.
    pub image_size: u32,
    /// Caption with the login instead of the display name.
    pub use_username: bool,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            columns_per_row: DEFAULT_COLUMNS_PER_ROW,
            image_size: DEFAULT_IMAGE_SIZE,
            use_username: false,
        }
    }
}

/// Templates keyed by block spec, with a fallback for unlisted blocks.
///
/// Spec keys are compared with all whitespace removed, so
/// `"contributors, bots"` and `"contributors,bots"` share a template.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    default: Template,
    blocks: HashMap<String, Template>,
}

impl Templates {
    #[must_use]
    pub fn new(default: Template) -> Self {
        Self {
            default,
            blocks: HashMap::new(),
        }
    }

    /// Register a template for blocks with the given spec text.
    #[must_use]
    pub fn with_block(mut self, spec: &str, template: Template) -> Self {
        self.blocks.insert(spec_key(spec), template);
        self
    }

    /// Template for a block spec.
    #[must_use]
    pub fn for_spec(&self, spec: &str) -> &Template {
        self.blocks.get(&spec_key(spec)).unwrap_or(&self.default)
    }
}

fn spec_key(spec: &str) -> String {
    spec.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Avatar URL used for entities without one.
#[must_use]
pub fn placeholder_avatar_url(login: &str, image_size: u32) -> String {
    format!("{PROFILE_BASE_URL}{login}.png?size={image_size}")
}

/// Render entities as the inner content of a block.
///
/// The result starts and ends with a newline so markers stay on their own
/// lines. An empty sequence renders an empty table.
#[must_use]
pub fn render(entities: &[Entity], template: &Template) -> String {
    let mut out = String::from("\n<table>\n\t<tbody>\n");
    for row in entities.chunks(template.columns_per_row.max(1)) {
        out.push_str("\t\t<tr>\n");
        for entity in row {
            render_cell(entity, template, &mut out);
        }
        out.push_str("\t\t</tr>\n");
    }
    out.push_str("\t</tbody>\n</table>\n");
    out
}

fn render_cell(entity: &Entity, template: &Template, out: &mut String) {
    let login = encode_double_quoted_attribute(&entity.login);
    let avatar = match &entity.avatar_url {
        Some(url) => Cow::Borrowed(url.as_str()),
        None => Cow::Owned(placeholder_avatar_url(&entity.login, template.image_size)),
    };
    let avatar = encode_double_quoted_attribute(&avatar);
    let (caption, title) = if template.use_username {
        (entity.login.as_str(), entity.name.as_deref())
    } else {
        (entity.display_name(), None)
    };

    out.push_str("\t\t\t<td align=\"center\">\n");
    writeln!(out, "\t\t\t\t<a href=\"{PROFILE_BASE_URL}{login}\">").unwrap();
    write!(
        out,
        "\t\t\t\t\t<img src=\"{avatar}\" width=\"{};\" alt=\"{login}\"",
        template.image_size
    )
    .unwrap();
    if let Some(title) = title {
        write!(out, " title=\"{}\"", encode_double_quoted_attribute(title)).unwrap();
    }
    out.push_str("/>\n");
    out.push_str("\t\t\t\t\t<br />\n");
    writeln!(out, "\t\t\t\t\t<sub><b>{}</b></sub>", encode_text(caption)).unwrap();
    out.push_str("\t\t\t\t</a>\n");
    out.push_str("\t\t\t</td>\n");
}
