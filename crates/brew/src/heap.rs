//! The object/lambda store.
//!
//! Objects and lambdas both live on a single arena indexed by `ObjectId`,
//! a compact handle standing in for the two heap-resident kinds this
//! language has. There is no garbage
//! collection: a Brew program's lifetime is one `run()` call, so the arena
//! simply grows for the duration of the run.

use crate::lambda::LambdaRecord;
use crate::object::ObjectRecord;
use crate::value::Value;

/// A handle into the heap. Two handles are the same entity iff they're
/// equal — there is no separate identity/equality distinction to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum HeapEntry {
    Object(ObjectRecord),
    Lambda(LambdaRecord),
}

/// Arena backing every `Value::Object` and `Value::Lambda` handle created
/// during a run.
#[derive(Debug, Default)]
pub struct Heap {
    entries: Vec<HeapEntry>,
}

impl Heap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc_object(&mut self, record: ObjectRecord) -> ObjectId {
        let id = ObjectId(self.entries.len() as u32);
        self.entries.push(HeapEntry::Object(record));
        id
    }

    pub(crate) fn alloc_lambda(&mut self, record: LambdaRecord) -> ObjectId {
        let id = ObjectId(self.entries.len() as u32);
        self.entries.push(HeapEntry::Lambda(record));
        id
    }

    pub(crate) fn object(&self, id: ObjectId) -> &ObjectRecord {
        match &self.entries[id.index()] {
            HeapEntry::Object(o) => o,
            HeapEntry::Lambda(_) => unreachable!("ObjectId did not point to an object"),
        }
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> &mut ObjectRecord {
        match &mut self.entries[id.index()] {
            HeapEntry::Object(o) => o,
            HeapEntry::Lambda(_) => unreachable!("ObjectId did not point to an object"),
        }
    }

    pub(crate) fn lambda(&self, id: ObjectId) -> &LambdaRecord {
        match &self.entries[id.index()] {
            HeapEntry::Lambda(l) => l,
            HeapEntry::Object(_) => unreachable!("ObjectId did not point to a lambda"),
        }
    }

    pub(crate) fn lambda_mut(&mut self, id: ObjectId) -> &mut LambdaRecord {
        match &mut self.entries[id.index()] {
            HeapEntry::Lambda(l) => l,
            HeapEntry::Object(_) => unreachable!("ObjectId did not point to a lambda"),
        }
    }

    /// Deep-copies the object graph rooted at `id`: a fresh object, fresh
    /// ancestors all the way up the prototype chain, and fresh copies of any
    /// `Object`/`Lambda` held in its fields. The result shares no heap
    /// identity with the original — this is what a pass-by-value argument or
    /// a `return` value gets instead of the original handle.
    pub(crate) fn deep_copy_object(&mut self, id: ObjectId) -> ObjectId {
        let (fields, parent) = {
            let record = self.object(id);
            (record.fields_snapshot(), record.parent())
        };
        let mut copied = ObjectRecord::new();
        for (name, stack) in fields {
            let new_stack = stack.iter().map(|v| self.deep_copy_value(v)).collect();
            copied.set_field_stack(name, new_stack);
        }
        if let Some(parent) = parent {
            copied.set_parent(Some(self.deep_copy_object(parent)));
        }
        self.alloc_object(copied)
    }

    /// Deep-copies a lambda: a fresh closure map container, but the
    /// `Object`/`Lambda` handles it holds are carried over unchanged (spec
    /// §9, deep-copy boundary (c) — the closure snapshot itself is already a
    /// disjoint container from the scope it was captured from; copying it
    /// again on pass-by-value/return doesn't need to chase further).
    pub(crate) fn deep_copy_lambda(&mut self, id: ObjectId) -> ObjectId {
        let record = self.lambda(id).clone();
        self.alloc_lambda(record)
    }

    pub(crate) fn deep_copy_value(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(id) => Value::Object(self.deep_copy_object(*id)),
            Value::Lambda(id) => Value::Lambda(self.deep_copy_lambda(*id)),
            other => other.clone(),
        }
    }
}
