//! Structural comparison of object graphs

use replica_meta::Registry;
use replica_model::{ContainerData, Identity, Value};
use std::collections::{HashMap, HashSet};

/// True if `a` and `b` are isomorphic under the default projection
///
/// Scalars and text compare by value, timestamps by instant. Reference
/// nodes are matched one-to-one, so sharing and cycles must line up too.
/// Records compare only the fields a default duplication carries.
pub fn graph_eq(registry: &Registry, a: &Value, b: &Value) -> bool {
    Isomorphism {
        registry,
        forward: HashMap::new(),
        backward: HashMap::new(),
        retained: Vec::new(),
    }
    .check(a, b)
}

struct Isomorphism<'r> {
    registry: &'r Registry,
    forward: HashMap<Identity, Identity>,
    backward: HashMap<Identity, Identity>,
    // keeps visited nodes alive so identities stay unique
    retained: Vec<Value>,
}

impl Isomorphism<'_> {
    fn check(&mut self, a: &Value, b: &Value) -> bool {
        match (a.identity(), b.identity()) {
            (None, None) => return a == b,
            (Some(ia), Some(ib)) => {
                if let Some(mapped) = self.forward.get(&ia) {
                    return *mapped == ib;
                }
                if self.backward.contains_key(&ib) {
                    return false;
                }
                self.forward.insert(ia, ib);
                self.backward.insert(ib, ia);
                self.retained.push(a.clone());
                self.retained.push(b.clone());
            }
            _ => return false,
        }

        match (a, b) {
            (Value::Timestamp(x), Value::Timestamp(y)) => x.get() == y.get(),
            (Value::Array(x), Value::Array(y)) => {
                x.element() == y.element() && self.all(&x.items(), &y.items())
            }
            (Value::Container(x), Value::Container(y)) => {
                if x.container_type() != y.container_type() {
                    return false;
                }
                match (x.snapshot(), y.snapshot()) {
                    (ContainerData::Sequence(l), ContainerData::Sequence(r)) => self.all(&l, &r),
                    (ContainerData::Set(l), ContainerData::Set(r)) => {
                        let l: Vec<Value> = l.into_iter().collect();
                        let r: Vec<Value> = r.into_iter().collect();
                        self.all(&l, &r)
                    }
                    (ContainerData::Map(l), ContainerData::Map(r)) => {
                        l.len() == r.len()
                            && l.iter()
                                .zip(r.iter())
                                .all(|((lk, lv), (rk, rv))| self.check(lk, rk) && self.check(lv, rv))
                    }
                    _ => false,
                }
            }
            (Value::Record(x), Value::Record(y)) => {
                if x.type_key() != y.type_key() {
                    return false;
                }
                let Ok(meta) = self.registry.metadata(x.type_key()) else {
                    return false;
                };
                meta.fields()
                    .iter()
                    .filter(|f| f.disposition(None).is_include())
                    .all(|f| match (x.get(f.name()), y.get(f.name())) {
                        (Ok(l), Ok(r)) => self.check(&l, &r),
                        _ => false,
                    })
            }
            _ => false,
        }
    }

    fn all(&mut self, left: &[Value], right: &[Value]) -> bool {
        left.len() == right.len() && left.iter().zip(right).all(|(l, r)| self.check(l, r))
    }
}

/// Every reference node reachable from `root` through default-included fields
///
/// Non-participating records are reported but not descended into.
pub fn reachable_references(registry: &Registry, root: &Value) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(value) = stack.pop() {
        let Some(id) = value.identity() else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        match &value {
            Value::Array(a) => stack.extend(a.items()),
            Value::Container(c) => match c.snapshot() {
                ContainerData::Sequence(items) => stack.extend(items),
                ContainerData::Set(items) => stack.extend(items),
                ContainerData::Map(entries) => {
                    for (k, v) in entries {
                        stack.push(k);
                        stack.push(v);
                    }
                }
            },
            Value::Record(r) => {
                if let Ok(meta) = registry.metadata(r.type_key()) {
                    for f in meta.fields().iter().filter(|f| f.disposition(None).is_include()) {
                        if let Ok(v) = r.get(f.name()) {
                            stack.push(v);
                        }
                    }
                }
            }
            _ => {}
        }
        found.push(value);
    }
    found
}

/// True if no reference node is reachable from both `a` and `b`
pub fn shares_no_references(registry: &Registry, a: &Value, b: &Value) -> bool {
    let left = reachable_references(registry, a);
    let right = reachable_references(registry, b);
    let ids: HashSet<Identity> = left.iter().filter_map(Value::identity).collect();
    right
        .iter()
        .filter_map(Value::identity)
        .all(|id| !ids.contains(&id))
}
