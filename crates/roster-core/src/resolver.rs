//! Category resolution.
//!
//! Turns a block's tokens into the ordered entity sequence it displays.
//! Tokens are applied left to right onto an [`EntityList`]: pools and logins
//! append, the exclude operator filters everything accumulated so far.

use crate::entity::{Entity, PoolSet};
use crate::parser::PriorEntities;
use crate::spec::{Category, Operator, Token};

/// Ordered entity sequence built up during resolution.
///
/// Duplicates are allowed; only [`remove_all_where`](Self::remove_all_where)
/// ever drops entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityList {
    entities: Vec<Entity>,
}

impl EntityList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entity at the end.
    pub fn append(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Append clones of `entities`, keeping their order.
    pub fn extend(&mut self, entities: &[Entity]) {
        self.entities.extend_from_slice(entities);
    }

    /// Remove every entity matching `predicate`. Returns how many were removed.
    pub fn remove_all_where(&mut self, mut predicate: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|entity| !predicate(entity));
        before - self.entities.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Logins in sequence order.
    #[must_use]
    pub fn logins(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.login.as_str()).collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Entity> {
        self.entities
    }
}

/// Resolve tokens into an ordered entity sequence.
///
/// A literal login takes its metadata from the first pool entity with that
/// login, then from `prior`, and is otherwise rendered bare.
#[must_use]
pub fn resolve(tokens: &[Token], prior: &PriorEntities, pools: &PoolSet) -> EntityList {
    let mut list = EntityList::new();

    for token in tokens {
        match token.category() {
            Category::Pool(pool) => list.extend(pools.get(pool)),
            Category::Login(login) => list.append(literal_entity(login, prior, pools)),
        }

        match &token.operator {
            Some(Operator::Exclude) => {
                list.remove_all_where(|entity| entity.login == token.name);
            }
            Some(Operator::Unknown(operator)) => {
                tracing::debug!(token = %token.name, operator = %operator, "Ignoring unknown operator");
            }
            None => {}
        }
    }

    list
}

fn literal_entity(login: &str, prior: &PriorEntities, pools: &PoolSet) -> Entity {
    if let Some(entity) = pools.find(login) {
        return entity.clone();
    }
    prior
        .get(login)
        .map_or_else(|| Entity::new(login), |record| record.to_entity(login))
}
