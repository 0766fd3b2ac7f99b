//! Entity and pool types.
//!
//! An [`Entity`] is one person or bot shown in a roster block. Pools are the
//! externally supplied, already classified entity lists a block can pull from.

/// Kind of entity being displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityKind {
    #[default]
    Person,
    Bot,
}

/// One person, bot or organization to display.
///
/// Only `login` is guaranteed; everything else falls back to a value derived
/// from the login at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Unique account identifier.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Person or bot.
    pub kind: EntityKind,
}

impl Entity {
    /// Create a bare entity with only a login.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            name: None,
            avatar_url: None,
            kind: EntityKind::Person,
        }
    }

    /// Create a bare bot entity.
    #[must_use]
    pub fn bot(login: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Bot,
            ..Self::new(login)
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Display name, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// Metadata recovered from a previous render of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorEntity {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl PriorEntity {
    /// Build an entity for `login` carrying this metadata.
    #[must_use]
    pub fn to_entity(&self, login: &str) -> Entity {
        Entity {
            login: login.to_owned(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
            kind: EntityKind::Person,
        }
    }
}

/// Reserved pool names a category token can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Contributors,
    Collaborators,
    Bots,
    Sponsors,
}

impl Pool {
    /// All pools, in lookup order.
    pub const ALL: [Self; 4] = [
        Self::Contributors,
        Self::Collaborators,
        Self::Bots,
        Self::Sponsors,
    ];

    /// Match a pool name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|pool| pool.as_str().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contributors => "contributors",
            Self::Collaborators => "collaborators",
            Self::Bots => "bots",
            Self::Sponsors => "sponsors",
        }
    }
}

/// The four entity pools available for one run.
///
/// Bot detection and affiliation filtering happen before the pools are built;
/// the engine only reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSet {
    pub contributors: Vec<Entity>,
    pub collaborators: Vec<Entity>,
    pub bots: Vec<Entity>,
    pub sponsors: Vec<Entity>,
}

impl PoolSet {
    /// Entities of one pool, in pool order.
    #[must_use]
    pub fn get(&self, pool: Pool) -> &[Entity] {
        match pool {
            Pool::Contributors => &self.contributors,
            Pool::Collaborators => &self.collaborators,
            Pool::Bots => &self.bots,
            Pool::Sponsors => &self.sponsors,
        }
    }

    /// First entity with exactly this login, searching pools in [`Pool::ALL`] order.
    #[must_use]
    pub fn find(&self, login: &str) -> Option<&Entity> {
        Pool::ALL
            .into_iter()
            .flat_map(|pool| self.get(pool))
            .find(|entity| entity.login == login)
    }
}
