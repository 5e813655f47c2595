//! Fixture record types and their registrations

use replica_meta::{FieldSpec, Registry, TypeSpec};
use replica_model::{
    AccessError, ArrayRef, ContainerRef, ContainerShape, ContainerType, FromValue, IntoValue,
    Object, RecordRef, TimestampRef, Value,
};
use replica_policy::{Projection, ProjectionMarker};
use std::rc::Rc;

/// Declares a record struct whose fields are all exposed by name
macro_rules! record {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        #[derive(Debug, Default, Clone)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl Object for $name {
            #[allow(unused_variables)]
            fn get(&mut self, field: &str) -> Result<Value, AccessError> {
                match field {
                    $(stringify!($field) => Ok(self.$field.clone().into_value()),)*
                    _ => Err(AccessError::unknown_field(stringify!($name), field)),
                }
            }

            #[allow(unused_variables)]
            fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
                match field {
                    $(stringify!($field) => self.$field = <$ty>::from_value(value)?,)*
                    _ => return Err(AccessError::unknown_field(stringify!($name), field)),
                }
                Ok(())
            }
        }
    };
}

pub struct Summary;
impl ProjectionMarker for Summary {}

pub struct Detail;
impl ProjectionMarker for Detail {}

pub struct Audit;
impl ProjectionMarker for Audit {}

pub fn summary() -> Projection {
    Projection::of::<Summary>()
}

pub fn detail() -> Projection {
    Projection::of::<Detail>()
}

pub fn audit() -> Projection {
    Projection::of::<Audit>()
}

/// A linked list subtype: recognized, but not canonical
pub const SUB_LINKED_LIST: ContainerType =
    ContainerType::custom("SubLinkedList", ContainerShape::Sequence);

record!(Scalars {
    count: i64,
    amount: Option<i64>,
    stamp: Option<TimestampRef>,
    label: Option<Rc<str>>,
    samples: Option<ArrayRef>,
});

record!(Holder {
    numbers: Option<ContainerRef>,
    lists: Option<ArrayRef>,
    scalars: Option<RecordRef>,
});

/// Materializes a new list on every read, like an ORM-enhanced entity
#[derive(Debug, Default)]
pub struct LazyList {
    pub items: Option<ContainerRef>,
}

impl Object for LazyList {
    fn get(&mut self, field: &str) -> Result<Value, AccessError> {
        match field {
            "items" => {
                let fresh = ContainerRef::new(ContainerType::LINKED_LIST);
                self.items = Some(fresh.clone());
                Ok(Value::Container(fresh))
            }
            _ => Err(AccessError::unknown_field("LazyList", field)),
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match field {
            "items" => self.items = Option::from_value(value)?,
            _ => return Err(AccessError::unknown_field("LazyList", field)),
        }
        Ok(())
    }
}

record!(Transfer {
    amount: i64,
    fee: Option<i64>,
    leg: Option<RecordRef>,
});

record!(Leg {
    amount: i64,
    memo: i64,
});

record!(Partial {
    secret: Option<i64>,
    shown: Option<i64>,
    loose: Option<i64>,
});

record!(Untouched { value: i64 });

record!(Stray { x: i64 });

record!(Ring {
    x: i64,
    link: Option<RecordRef>,
});

record!(Link {
    p: i64,
    ring: Option<RecordRef>,
});

record!(Cell {
    cells: Option<ArrayRef>,
    numbers: Option<ContainerRef>,
});

record!(StaticCounter { count: i64 });

record!(FrozenField { id: i64 });

/// Non-participating ancestor of [`Derived`]
#[derive(Debug, Default, Clone)]
pub struct Base {
    pub x: i64,
    pub z: i64,
}

impl Object for Base {
    fn get(&mut self, field: &str) -> Result<Value, AccessError> {
        match field {
            "x" => Ok(self.x.into_value()),
            "z" => Ok(self.z.into_value()),
            _ => Err(AccessError::unknown_field("Base", field)),
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match field {
            "x" => self.x = i64::from_value(value)?,
            "z" => self.z = i64::from_value(value)?,
            _ => return Err(AccessError::unknown_field("Base", field)),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct Derived {
    pub base: Base,
    pub y: i64,
}

impl Object for Derived {
    fn get(&mut self, field: &str) -> Result<Value, AccessError> {
        match field {
            "y" => Ok(self.y.into_value()),
            _ => self.base.get(field),
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match field {
            "y" => self.y = i64::from_value(value)?,
            _ => self.base.set(field, value)?,
        }
        Ok(())
    }
}

record!(Pair {
    first: Option<ContainerRef>,
    second: Option<ContainerRef>,
});

record!(Projected {
    summary_only: Option<i64>,
    detail_not_summary: Option<i64>,
    both: Option<i64>,
});

record!(Dispositions {
    plain: Option<i64>,
    kept: Option<i64>,
    dropped: Option<i64>,
    kept_on_summary: Option<i64>,
    dropped_on_summary: Option<i64>,
    only_summary: Option<i64>,
    all_but_summary: Option<i64>,
    summary_not_detail: Option<i64>,
});

record!(BothUnscoped { field: Option<i64> });

record!(Overlapping { field: Option<i64> });

record!(Defaults {
    text: Option<Rc<str>>,
    flag: bool,
    number: i64,
    ratio: f64,
    set: Option<ContainerRef>,
    array: Option<ArrayRef>,
});

record!(ProjectedCopy {
    name: Option<Rc<str>>,
    audited: i64,
    scoped: Option<i64>,
});

record!(Shape {});

/// Descendant of [`Shape`]; only the subtype declares fields
#[derive(Debug, Default, Clone)]
pub struct Square {
    pub shape: Shape,
    pub side: i64,
}

impl Object for Square {
    fn get(&mut self, field: &str) -> Result<Value, AccessError> {
        match field {
            "side" => Ok(self.side.into_value()),
            _ => self.shape.get(field),
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match field {
            "side" => self.side = i64::from_value(value)?,
            _ => self.shape.set(field, value)?,
        }
        Ok(())
    }
}

record!(ShapeHolder {
    shape: Option<RecordRef>,
});

record!(AnyHolder { any: Value });

record!(Money { cents: Option<i64> });

record!(Wallet {
    money: Option<RecordRef>,
});

record!(Twin {
    left: Option<RecordRef>,
    right: Option<RecordRef>,
});

record!(Inner { v: i64 });

record!(Sample { v: i64, w: i64 });

/// Same field names as [`Sample`], declared independently
record!(Reading { v: i64, w: bool });

record!(GraphNode {
    label: i64,
    next: Option<RecordRef>,
    peers: Option<ContainerRef>,
});

/// Register every fixture type and [`SUB_LINKED_LIST`] with `registry`
pub fn register_fixtures(registry: &Registry) {
    registry.register_container(SUB_LINKED_LIST);

    registry.register(
        TypeSpec::constructible::<Scalars>()
            .participates()
            .field(FieldSpec::new("count").include())
            .field(FieldSpec::new("amount").include())
            .field(FieldSpec::new("stamp").include())
            .field(FieldSpec::new("label").include().inbound())
            .field(FieldSpec::new("samples").include()),
    );
    registry.register(
        TypeSpec::constructible::<Holder>()
            .participates()
            .field(FieldSpec::new("numbers").include())
            .field(FieldSpec::new("lists").include())
            .field(FieldSpec::new("scalars").include().record::<Scalars>()),
    );
    registry.register(
        TypeSpec::constructible::<LazyList>()
            .participates()
            .field(FieldSpec::new("items").include()),
    );
    registry.register(
        TypeSpec::constructible::<Transfer>()
            .participates()
            .field(FieldSpec::new("amount").inbound())
            .field(FieldSpec::new("fee").inbound().include())
            .field(FieldSpec::new("leg").inbound().record::<Leg>()),
    );
    registry.register(
        TypeSpec::constructible::<Leg>()
            .participates()
            .field(FieldSpec::new("amount").inbound())
            .field(FieldSpec::new("memo")),
    );
    registry.register(
        TypeSpec::constructible::<Partial>()
            .participates()
            .field(FieldSpec::new("secret").exclude())
            .field(FieldSpec::new("shown").include())
            .field(FieldSpec::new("loose")),
    );
    registry.register(
        TypeSpec::constructible::<Untouched>()
            .participates()
            .field(FieldSpec::new("value").include()),
    );
    registry.register(
        TypeSpec::constructible::<Stray>().field(FieldSpec::new("x").include().inbound()),
    );
    registry.register(
        TypeSpec::constructible::<Ring>()
            .participates()
            .field(FieldSpec::new("x").include())
            .field(FieldSpec::new("link").include().record::<Link>()),
    );
    registry.register(
        TypeSpec::constructible::<Link>()
            .participates()
            .field(FieldSpec::new("p").include())
            .field(FieldSpec::new("ring").include().record::<Ring>()),
    );
    registry.register(
        TypeSpec::constructible::<Cell>()
            .participates()
            .field(FieldSpec::new("cells").include())
            .field(FieldSpec::new("numbers").include()),
    );
    registry.register(
        TypeSpec::constructible::<StaticCounter>()
            .participates()
            .field(FieldSpec::new("count").include().static_field()),
    );
    registry.register(
        TypeSpec::constructible::<FrozenField>()
            .participates()
            .field(FieldSpec::new("id").include().final_field()),
    );
    registry.register(
        TypeSpec::of::<Base>()
            .field(FieldSpec::new("x").include())
            .field(FieldSpec::new("z")),
    );
    registry.register(
        TypeSpec::constructible::<Derived>()
            .extends::<Base>()
            .participates()
            .field(FieldSpec::new("y").include()),
    );
    registry.register(
        TypeSpec::constructible::<Pair>()
            .participates()
            .field(FieldSpec::new("first").include())
            .field(FieldSpec::new("second").include()),
    );
    registry.register(
        TypeSpec::constructible::<Projected>()
            .participates()
            .field(FieldSpec::new("summary_only").include_for([summary()]).exclude())
            .field(
                FieldSpec::new("detail_not_summary")
                    .include_for([detail()])
                    .exclude_for([summary()]),
            )
            .field(FieldSpec::new("both").include_for([summary(), detail()])),
    );
    registry.register(
        TypeSpec::constructible::<Dispositions>()
            .participates()
            .field(FieldSpec::new("plain"))
            .field(FieldSpec::new("kept").include())
            .field(FieldSpec::new("dropped").exclude())
            .field(FieldSpec::new("kept_on_summary").include_for([summary()]))
            .field(FieldSpec::new("dropped_on_summary").exclude_for([summary()]))
            .field(FieldSpec::new("only_summary").include_for([summary()]).exclude())
            .field(FieldSpec::new("all_but_summary").exclude_for([summary()]).include())
            .field(
                FieldSpec::new("summary_not_detail")
                    .include_for([summary()])
                    .exclude_for([detail()]),
            ),
    );
    registry.register(
        TypeSpec::constructible::<BothUnscoped>()
            .participates()
            .field(FieldSpec::new("field").include().exclude()),
    );
    registry.register(
        TypeSpec::constructible::<Overlapping>()
            .participates()
            .field(
                FieldSpec::new("field")
                    .include_for([summary()])
                    .exclude_for([detail(), summary()]),
            ),
    );
    registry.register(
        TypeSpec::constructible::<Defaults>()
            .participates()
            .field(FieldSpec::new("text").exclude())
            .field(FieldSpec::new("flag").exclude())
            .field(FieldSpec::new("number").exclude())
            .field(FieldSpec::new("ratio").exclude())
            .field(FieldSpec::new("set").exclude())
            .field(FieldSpec::new("array").exclude()),
    );
    registry.register(
        TypeSpec::constructible::<ProjectedCopy>()
            .participates()
            .field(FieldSpec::new("name").inbound())
            .field(FieldSpec::new("audited").inbound_for([audit()]))
            .field(FieldSpec::new("scoped").inbound_for([summary(), detail()])),
    );
    registry.register(TypeSpec::constructible::<Shape>().participates());
    registry.register(
        TypeSpec::constructible::<Square>()
            .extends::<Shape>()
            .participates()
            .field(FieldSpec::new("side").include()),
    );
    registry.register(
        TypeSpec::constructible::<ShapeHolder>()
            .participates()
            .field(FieldSpec::new("shape").include().record::<Shape>()),
    );
    registry.register(
        TypeSpec::constructible::<AnyHolder>()
            .participates()
            .field(FieldSpec::new("any").include()),
    );
    registry.register(
        TypeSpec::constructible::<Money>()
            .participates()
            .field(FieldSpec::new("cents").include()),
    );
    registry.register(
        TypeSpec::constructible::<Wallet>()
            .participates()
            .field(FieldSpec::new("money").include().record::<Money>()),
    );
    registry.register(
        TypeSpec::constructible::<Twin>()
            .participates()
            .field(FieldSpec::new("left").inbound().record::<Inner>())
            .field(FieldSpec::new("right").inbound().record::<Inner>()),
    );
    registry.register(
        TypeSpec::constructible::<Inner>()
            .participates()
            .field(FieldSpec::new("v").inbound()),
    );
    registry.register(
        TypeSpec::constructible::<Sample>()
            .participates()
            .field(FieldSpec::new("v").inbound())
            .field(FieldSpec::new("w").inbound()),
    );
    registry.register(
        TypeSpec::constructible::<Reading>()
            .participates()
            .field(FieldSpec::new("v").inbound())
            .field(FieldSpec::new("w").inbound()),
    );
    registry.register(
        TypeSpec::constructible::<GraphNode>()
            .participates()
            .field(FieldSpec::new("label").include())
            .field(FieldSpec::new("next").include().record::<GraphNode>())
            .field(FieldSpec::new("peers").include()),
    );
}

/// Isolated registry holding every fixture type
#[must_use]
pub fn fixture_registry() -> Registry {
    let registry = Registry::new();
    register_fixtures(&registry);
    registry
}
