//! Capability registry: widget families, constructors and attribute setters.
//!
//! The designer core never knows how a concrete widget stores its state.
//! Collaborators register, per widget family:
//!
//! - a [`Family`] entry naming its superclass and structural traits
//! - a constructor producing a fresh [`Widget`] instance
//! - setters keyed by `(owner family, method name)` that apply a raw
//!   attribute value to an instance
//!
//! The core then resolves and invokes these uniformly. Setters are
//! write-only; there is no inverse, which is why attribute removal rebuilds
//! the instance.
//!
//! # Example
//!
//! ```
//! use horizon_designer_core::{CapabilityRegistry, FamilyTraits, SetterError};
//!
//! let mut registry = CapabilityRegistry::new();
//! registry.register_family("demo.View", None, FamilyTraits::default());
//! registry.register_setter("demo.View", "setAlpha", |_widget, value| {
//!     value
//!         .parse::<f32>()
//!         .map(|_| ())
//!         .map_err(|_| SetterError::invalid(value, "a float"))
//! });
//! assert!(registry.setter("demo.View", "setAlpha").is_some());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CapabilityError, SetterError};
use crate::geometry::{LayoutAxis, Size};
use crate::logging::targets;
use crate::schema::AttributeDefinition;

/// A live widget instance behind a node slot.
pub trait Widget: Any + Send + fmt::Debug {
    /// Concrete family name this instance was constructed as.
    fn type_name(&self) -> &str;

    /// Apply the minimum-size floor so empty widgets stay hittable.
    fn set_minimum_size(&mut self, size: Size);

    /// Axis along which this widget stacks children, if it is a linear
    /// container.
    fn layout_axis(&self) -> Option<LayoutAxis> {
        None
    }

    /// Assign or clear the identifier directly, bypassing the setter table.
    /// `identifier` carries no `@+id/` prefix.
    fn set_identifier(&mut self, identifier: Option<&str>) {
        let _ = identifier;
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Applies one raw attribute value to a widget.
pub type SetterFn = Arc<dyn Fn(&mut dyn Widget, &str) -> Result<(), SetterError> + Send + Sync>;

/// Builds a fresh widget of one family.
pub type ConstructorFn = Arc<dyn Fn() -> Box<dyn Widget> + Send + Sync>;

/// Structural traits of a widget family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyTraits {
    /// Accepts dropped children.
    pub container: bool,
    /// Orders its own items internally; repositioning inside such a
    /// container defers detachment until drop.
    pub manages_items: bool,
    /// Composite widget whose children are never serialized.
    pub opaque: bool,
    /// Design-time specialization hidden from portable markup.
    pub specialization: bool,
}

impl FamilyTraits {
    /// Traits of a plain container.
    pub fn container() -> Self {
        Self {
            container: true,
            ..Self::default()
        }
    }

    pub fn managing_items(mut self) -> Self {
        self.manages_items = true;
        self
    }

    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    pub fn specialization(mut self) -> Self {
        self.specialization = true;
        self
    }
}

/// A registered widget family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub type_name: String,
    pub superclass: Option<String>,
    pub traits: FamilyTraits,
}

/// Table of families, constructors and setters.
#[derive(Default)]
pub struct CapabilityRegistry {
    families: HashMap<String, Family>,
    constructors: HashMap<String, ConstructorFn>,
    setters: HashMap<String, HashMap<String, SetterFn>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a family.
    pub fn register_family(
        &mut self,
        type_name: impl Into<String>,
        superclass: Option<&str>,
        traits: FamilyTraits,
    ) {
        let type_name = type_name.into();
        tracing::trace!(target: targets::CAPABILITY, %type_name, ?superclass, "registered family");
        self.families.insert(
            type_name.clone(),
            Family {
                type_name,
                superclass: superclass.map(str::to_owned),
                traits,
            },
        );
    }

    /// Register the constructor for a family.
    pub fn register_constructor<F>(&mut self, type_name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Widget> + Send + Sync + 'static,
    {
        self.constructors.insert(type_name.into(), Arc::new(constructor));
    }

    /// Register a setter under `(owner, method)`.
    pub fn register_setter<F>(&mut self, owner: impl Into<String>, method: impl Into<String>, setter: F)
    where
        F: Fn(&mut dyn Widget, &str) -> Result<(), SetterError> + Send + Sync + 'static,
    {
        self.setters
            .entry(owner.into())
            .or_default()
            .insert(method.into(), Arc::new(setter));
    }

    /// Look up a family.
    pub fn family(&self, type_name: &str) -> Option<&Family> {
        self.families.get(type_name)
    }

    /// Traits of a family; unregistered types have no traits.
    pub fn traits(&self, type_name: &str) -> FamilyTraits {
        self.families
            .get(type_name)
            .map(|f| f.traits)
            .unwrap_or_default()
    }

    /// Whether a constructor exists for the type.
    pub fn can_construct(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Build a fresh instance of `type_name`.
    pub fn construct(&self, type_name: &str) -> Result<Box<dyn Widget>, CapabilityError> {
        let constructor = self
            .constructors
            .get(type_name)
            .ok_or_else(|| CapabilityError::UnknownNodeType(type_name.to_owned()))?;
        tracing::trace!(target: targets::CAPABILITY, type_name, "constructing widget");
        Ok(constructor())
    }

    /// Look up the setter for `(owner, method)`.
    pub fn setter(&self, owner: &str, method: &str) -> Option<&SetterFn> {
        self.setters.get(owner).and_then(|m| m.get(method))
    }

    /// Apply `value` to `widget` through the setter named by `definition`.
    pub fn invoke(
        &self,
        definition: &AttributeDefinition,
        widget: &mut dyn Widget,
        value: &str,
    ) -> Result<(), CapabilityError> {
        let setter = self
            .setter(&definition.owner_type, &definition.method_name)
            .ok_or_else(|| CapabilityError::SetterNotFound {
                owner: definition.owner_type.clone(),
                method: definition.method_name.clone(),
            })?;
        tracing::trace!(
            target: targets::CAPABILITY,
            owner = %definition.owner_type,
            method = %definition.method_name,
            value,
            "invoking setter"
        );
        setter(widget, value).map_err(|source| CapabilityError::SetterInvocation {
            owner: definition.owner_type.clone(),
            method: definition.method_name.clone(),
            source,
        })
    }

    /// The family chain of `type_name`, most specific first.
    ///
    /// The chain always starts with `type_name` itself, registered or not,
    /// and stops at the first family without a registered superclass.
    pub fn lineage<'a>(&'a self, type_name: &'a str) -> Vec<&'a str> {
        let mut chain = vec![type_name];
        let mut current = self.families.get(type_name);
        while let Some(family) = current {
            let Some(parent) = family.superclass.as_deref() else {
                break;
            };
            if chain.contains(&parent) {
                tracing::warn!(target: targets::CAPABILITY, type_name, parent, "family hierarchy loops");
                break;
            }
            chain.push(parent);
            current = self.families.get(parent);
        }
        chain
    }

    /// Whether `type_name` is `ancestor` or derives from it.
    pub fn is_a(&self, type_name: &str, ancestor: &str) -> bool {
        self.lineage(type_name).contains(&ancestor)
    }

    /// The nearest family in the lineage that is not a design-time
    /// specialization.
    pub fn portable_type_name<'a>(&'a self, type_name: &'a str) -> &'a str {
        self.lineage(type_name)
            .into_iter()
            .find(|t| !self.traits(t).specialization)
            .unwrap_or(type_name)
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("families", &self.families.len())
            .field("constructors", &self.constructors.len())
            .field(
                "setters",
                &self.setters.values().map(HashMap::len).sum::<usize>(),
            )
            .finish()
    }
}

static_assertions::assert_impl_all!(CapabilityRegistry: Send, Sync);
