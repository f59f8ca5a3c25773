use crate::bytecode::buffer::GrowableArray;
use crate::vm::Value;

/// Ordered table of literal values referenced by index from instructions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    values: GrowableArray<Value>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its index. Equal values are not merged.
    pub fn append(&mut self, value: Value) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_sequential_indices() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.append(Value::Number(1.0)), 0);
        assert_eq!(pool.append(Value::Number(2.0)), 1);
        assert_eq!(pool.append(Value::Bool(true)), 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_append_does_not_deduplicate() {
        let mut pool = ConstantPool::new();
        let first = pool.append(Value::Number(5.0));
        let second = pool.append(Value::Number(5.0));

        assert_ne!(first, second);
        assert_eq!(pool.get(first), pool.get(second));
    }

    #[test]
    fn test_get_out_of_range() {
        let pool = ConstantPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), None);
    }
}
