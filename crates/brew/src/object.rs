//! Prototype-based objects.

use std::rc::Rc;

use ahash::AHashMap;

use crate::exceptions::{BrewException, RunResult};
use crate::heap::{Heap, ObjectId};
use crate::value::Value;

/// `proto` is not a regular field: reading it returns the parent handle (or
/// is absent if there isn't one) and writing it rebinds the parent pointer,
/// rather than taking part in the ordinary field-stack storage below.
const PROTO_FIELD: &str = "proto";

/// A field is stored the same way an environment binding is — a name mapped
/// to a stack of values — even though in practice a
/// field's stack never grows past one entry, since nothing ever pushes onto
/// it beyond its initial assignment.
#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectRecord {
    fields: AHashMap<Rc<str>, Vec<Value>>,
    parent: Option<ObjectId>,
}

impl ObjectRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub fn fields_snapshot(&self) -> Vec<(Rc<str>, Vec<Value>)> {
        self.fields
            .iter()
            .map(|(name, stack)| (name.clone(), stack.clone()))
            .collect()
    }

    pub fn set_field_stack(&mut self, name: Rc<str>, stack: Vec<Value>) {
        self.fields.insert(name, stack);
    }

    /// Field read: walks the prototype chain starting at `id`,
    /// returning the first hit. `proto` itself reads the parent handle.
    pub fn get_field(id: ObjectId, field: &str, heap: &Heap) -> RunResult<Value> {
        if field == PROTO_FIELD {
            return match heap.object(id).parent {
                Some(parent) => Ok(Value::Object(parent)),
                None => Err(BrewException::name_error("Field proto not found")),
            };
        }
        let mut current = id;
        loop {
            let record = heap.object(current);
            if let Some(stack) = record.fields.get(field) {
                return Ok(stack
                    .last()
                    .expect("a stored field stack is never empty")
                    .clone());
            }
            match record.parent {
                Some(parent) => current = parent,
                None => return Err(BrewException::name_error(format!("Field {field} not found"))),
            }
        }
    }

    /// Field write: always targets the receiver's own
    /// fields, never a prototype ancestor's. `proto` must be assigned an
    /// `Object` (or `nil` to clear it).
    pub fn assign_field(id: ObjectId, field: &str, value: Value, heap: &mut Heap) -> RunResult<()> {
        if field == PROTO_FIELD {
            return match value {
                Value::Object(parent_id) => {
                    heap.object_mut(id).parent = Some(parent_id);
                    Ok(())
                }
                Value::Nil => {
                    heap.object_mut(id).parent = None;
                    Ok(())
                }
                _ => Err(BrewException::type_error("Assigning invalid type as prototype")),
            };
        }
        let record = heap.object_mut(id);
        let stack = record.fields.entry(Rc::from(field)).or_default();
        match stack.last_mut() {
            Some(slot) => *slot = value,
            None => stack.push(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_read_walks_prototype_chain() {
        let mut heap = Heap::new();
        let parent = heap.alloc_object(ObjectRecord::new());
        ObjectRecord::assign_field(parent, "x", Value::Int(7), &mut heap).unwrap();
        let child = heap.alloc_object(ObjectRecord::new());
        ObjectRecord::assign_field(child, PROTO_FIELD, Value::Object(parent), &mut heap).unwrap();

        let got = ObjectRecord::get_field(child, "x", &heap).unwrap();
        assert!(matches!(got, Value::Int(7)));
    }

    #[test]
    fn field_write_never_touches_ancestor() {
        let mut heap = Heap::new();
        let parent = heap.alloc_object(ObjectRecord::new());
        ObjectRecord::assign_field(parent, "x", Value::Int(1), &mut heap).unwrap();
        let child = heap.alloc_object(ObjectRecord::new());
        ObjectRecord::assign_field(child, PROTO_FIELD, Value::Object(parent), &mut heap).unwrap();

        ObjectRecord::assign_field(child, "x", Value::Int(99), &mut heap).unwrap();

        assert!(matches!(
            ObjectRecord::get_field(child, "x", &heap).unwrap(),
            Value::Int(99)
        ));
        assert!(matches!(
            ObjectRecord::get_field(parent, "x", &heap).unwrap(),
            Value::Int(1)
        ));
    }

    #[test]
    fn unknown_field_is_name_error() {
        let mut heap = Heap::new();
        let id = heap.alloc_object(ObjectRecord::new());
        let err = ObjectRecord::get_field(id, "missing", &heap).unwrap_err();
        assert_eq!(err.kind(), crate::exceptions::ExcType::NameError);
    }
}
