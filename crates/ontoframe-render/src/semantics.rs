//! Per-property open/closed-world policy.
//!
//! OPEN renders a link's values as an existential sample ("has at least
//! these"); CLOSED additionally asserts a universal closure ("and nothing
//! else"). The default world applies everywhere except for an explicit
//! exception list, which flips the default for the named properties *and
//! their declared sub-properties* — exceptions describe leaf behaviors that
//! propagate downward with specialization, never upward to super-properties.

use ontoframe_owl::{Iri, Ontology};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum World {
    Open,
    Closed,
}

impl World {
    pub fn flipped(self) -> World {
        match self {
            World::Open => World::Closed,
            World::Closed => World::Open,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertySemantics {
    default_world: World,
    exceptions: Vec<Iri>,
}

impl PropertySemantics {
    pub fn new(default_world: World) -> Self {
        Self {
            default_world,
            exceptions: Vec::new(),
        }
    }

    pub fn with_exceptions(default_world: World, exceptions: Vec<Iri>) -> Self {
        Self {
            default_world,
            exceptions,
        }
    }

    pub fn default_world(&self) -> World {
        self.default_world
    }

    /// Resolve the world for one property against the ontology's property
    /// hierarchy.
    pub fn world_of(&self, ontology: &Ontology, property: &Iri) -> World {
        let flipped = self
            .exceptions
            .iter()
            .any(|exception| ontology.is_told_subproperty(property, exception));
        if flipped {
            self.default_world.flipped()
        } else {
            self.default_world
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontoframe_owl::Axiom;

    fn iri(s: &str) -> Iri {
        Iri::new(format!("http://ex.org#{s}"))
    }

    /// Property chain: q ⊑ p ⊑ o.
    fn ontology() -> Ontology {
        let mut ont = Ontology::new();
        ont.add_axiom(Axiom::SubObjectPropertyOf {
            sub: iri("p"),
            sup: iri("o"),
        });
        ont.add_axiom(Axiom::SubObjectPropertyOf {
            sub: iri("q"),
            sup: iri("p"),
        });
        ont
    }

    #[test]
    fn exception_flips_property_and_sub_properties_only() {
        let ont = ontology();
        let semantics = PropertySemantics::with_exceptions(World::Open, vec![iri("p")]);

        assert_eq!(semantics.world_of(&ont, &iri("p")), World::Closed);
        assert_eq!(semantics.world_of(&ont, &iri("q")), World::Closed);
        // Super-property stays at the default.
        assert_eq!(semantics.world_of(&ont, &iri("o")), World::Open);
    }

    #[test]
    fn closed_default_flips_the_other_way() {
        let ont = ontology();
        let semantics = PropertySemantics::with_exceptions(World::Closed, vec![iri("q")]);

        assert_eq!(semantics.world_of(&ont, &iri("q")), World::Open);
        assert_eq!(semantics.world_of(&ont, &iri("p")), World::Closed);
    }

    #[test]
    fn no_exceptions_means_the_default_everywhere() {
        let ont = ontology();
        let semantics = PropertySemantics::new(World::Open);
        for name in ["o", "p", "q", "unrelated"] {
            assert_eq!(semantics.world_of(&ont, &iri(name)), World::Open);
        }
    }
}
