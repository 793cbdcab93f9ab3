//! In-memory move catalog.

use std::collections::BTreeMap;

use super::{CatalogError, MoveDefinition, MoveId, MoveOracle};

/// Catalog backed by a vector indexed by [`MoveId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticMoveCatalog {
    moves: Vec<MoveDefinition>,
    by_name: BTreeMap<String, MoveId>,
}

impl StaticMoveCatalog {
    /// Builds a catalog, checking ids, names, parameter ranges and cross references.
    pub fn new(moves: Vec<MoveDefinition>) -> Result<Self, CatalogError> {
        if moves.len() > usize::from(u16::MAX) {
            return Err(CatalogError::TooManyMoves(moves.len()));
        }

        let mut by_name = BTreeMap::new();
        for (index, def) in moves.iter().enumerate() {
            let expected = MoveId(index as u16);
            if def.id != expected {
                return Err(CatalogError::IdMismatch {
                    name: def.name.clone(),
                    expected,
                    found: def.id,
                });
            }
            if by_name.insert(def.name.clone(), def.id).is_some() {
                return Err(CatalogError::DuplicateName(def.name.clone()));
            }
            def.validate()?;
        }

        let catalog = Self { moves, by_name };
        catalog.check_references()?;
        Ok(catalog)
    }

    fn check_references(&self) -> Result<(), CatalogError> {
        for def in &self.moves {
            let boosted = def
                .toggle()
                .and_then(|toggle| toggle.damage_boost.as_ref())
                .map(|boost| boost.moves.as_slice())
                .unwrap_or(&[]);
            let granted = def.grants().iter().map(|grant| grant.move_id);

            for reference in boosted.iter().copied().chain(granted) {
                if self.definition(reference).is_none() {
                    return Err(CatalogError::UnknownReference {
                        name: def.name.clone(),
                        reference,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveDefinition> {
        self.moves.iter()
    }
}

impl MoveOracle for StaticMoveCatalog {
    fn definition(&self, id: MoveId) -> Option<&MoveDefinition> {
        self.moves.get(id.index())
    }

    fn lookup(&self, name: &str) -> Option<MoveId> {
        self.by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        ArmorEffect, DamageEffect, MoveCategory, MoveEffect, MoveGrant, MoveOracle,
    };

    #[test]
    fn lookup_resolves_names_to_ids() {
        let catalog = StaticMoveCatalog::new(vec![
            MoveDefinition::new(MoveId(0), "Punch", MoveCategory::Basic)
                .with_effect(MoveEffect::Damage(DamageEffect::percent(0.03))),
            MoveDefinition::new(MoveId(1), "Kick", MoveCategory::Basic)
                .with_effect(MoveEffect::Damage(DamageEffect::percent(0.05))),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.lookup("Kick"), Some(MoveId(1)));
        assert_eq!(catalog.definition(MoveId(0)).map(|d| d.name.as_str()), Some("Punch"));
        assert!(catalog.definition(MoveId(9)).is_none());
    }

    #[test]
    fn rejects_dangling_grant() {
        let armor = MoveDefinition::new(MoveId(0), "Light Dragon Armor", MoveCategory::Item)
            .with_effect(MoveEffect::Armor(ArmorEffect {
                durability: 19_000,
                reduction: 0.15,
            }))
            .with_effect(MoveEffect::GrantMoves(vec![MoveGrant {
                move_id: MoveId(7),
                uses: 1,
            }]));

        let err = StaticMoveCatalog::new(vec![armor]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownReference { .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = StaticMoveCatalog::new(vec![
            MoveDefinition::new(MoveId(0), "Punch", MoveCategory::Basic),
            MoveDefinition::new(MoveId(1), "Punch", MoveCategory::Basic),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateName("Punch".into()));
    }
}
