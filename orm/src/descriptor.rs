//! Entity metadata registry.
//!
//! [`describe`] validates an [`Entity`]'s static declaration on first use and
//! caches the resulting [`EntityDescriptor`] for the life of the process.
//! Descriptors are immutable once built.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::entity::{Entity, FieldDef};
use crate::error::MappingError;

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static EntityDescriptor>>> = OnceLock::new();

/// Validated table mapping for one record type.
#[derive(Debug)]
pub struct EntityDescriptor {
    entity: &'static str,
    table: &'static str,
    fields: &'static [FieldDef],
    identity: usize,
}

impl EntityDescriptor {
    fn build(
        entity: &'static str,
        table: &'static str,
        fields: &'static [FieldDef],
    ) -> Result<Self, MappingError> {
        if table.trim().is_empty() {
            return Err(MappingError::MissingTable { entity });
        }

        let mut identities = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.identity)
            .map(|(i, _)| i);
        let identity = identities
            .next()
            .ok_or(MappingError::MissingIdentity { entity })?;
        if identities.next().is_some() {
            return Err(MappingError::DuplicateIdentity { entity });
        }

        Ok(Self {
            entity,
            table,
            fields,
            identity,
        })
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// All persisted fields, in column order.
    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn identity(&self) -> &'static FieldDef {
        &self.fields[self.identity]
    }

    /// Persisted fields minus the identity, in column order.
    pub fn non_identity_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        let fields = self.fields;
        fields.iter().filter(|f| !f.identity)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        let fields = self.fields;
        fields.iter().find(|f| f.name == name)
    }
}

/// Look up (building and caching on first call) the descriptor for `E`.
pub fn describe<E: Entity>() -> Result<&'static EntityDescriptor, MappingError> {
    let registry = REGISTRY.get_or_init(Default::default);
    let key = TypeId::of::<E>();

    let cached = registry
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied();
    if let Some(descriptor) = cached {
        return Ok(descriptor);
    }

    let built = EntityDescriptor::build(E::ENTITY, E::TABLE, E::FIELDS)?;
    tracing::debug!(entity = E::ENTITY, table = E::TABLE, "registered entity descriptor");

    let mut map = registry.write().unwrap_or_else(PoisonError::into_inner);
    let descriptor = *map
        .entry(key)
        .or_insert_with(|| -> &'static EntityDescriptor { Box::leak(Box::new(built)) });
    Ok(descriptor)
}
