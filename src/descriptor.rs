// vim: tw=80
//! The method-descriptor registry.
//!
//! Instead of runtime reflection, every mockable type carries an explicit
//! table of method signatures, built when the mock is created and
//! consulted by the type guard and the matcher arity checks.

use std::sync::Arc;

use crate::value::ValueType;

/// One method signature: name, parameter kinds and return kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<ValueType>,
    ret: ValueType,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        params: &[ValueType],
        ret: ValueType,
    ) -> Self {
        MethodDescriptor {
            name: name.into(),
            params: params.to_vec(),
            ret,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn return_type(&self) -> ValueType {
        self.ret
    }
}

/// The full signature table of one mockable type.
#[derive(Clone, Debug, Default)]
pub struct TypeDescriptor {
    type_name: String,
    methods: Vec<Arc<MethodDescriptor>>,
}

impl TypeDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        TypeDescriptor {
            type_name: type_name.into(),
            methods: Vec::new(),
        }
    }

    /// Register one method signature.  Methods are identified by name;
    /// overloading is not modeled.
    pub fn method(
        mut self,
        name: &str,
        params: &[ValueType],
        ret: ValueType,
    ) -> Self {
        self.methods
            .push(Arc::new(MethodDescriptor::new(name, params, ret)));
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn find(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let td = TypeDescriptor::new("List")
            .method("add", &[ValueType::Str], ValueType::Bool)
            .method("size", &[], ValueType::Int);
        let add = td.find("add").unwrap();
        assert_eq!(1, add.arity());
        assert_eq!(ValueType::Bool, add.return_type());
        assert!(td.find("remove").is_none());
    }
}
