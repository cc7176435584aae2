use std::collections::HashSet;

use crate::descriptor::TypeKind;
use crate::{TypeDescriptor, TypeId, TypeStore};

impl TypeStore {
    /// Linearized supertype closure of `desc`, memoized on the descriptor.
    ///
    /// Order: the superclass chain nearest first, then interfaces depth-first in declaration
    /// order, starting at `desc` and continuing with each superclass. Every type appears once
    /// no matter how many paths lead to it, and `desc` itself is never included.
    pub(crate) fn supertypes<'d>(&self, desc: &'d TypeDescriptor) -> &'d [TypeId] {
        desc.supertypes.get_or_init(|| self.compute_supertypes(desc))
    }

    fn compute_supertypes(&self, desc: &TypeDescriptor) -> Vec<TypeId> {
        match desc.kind() {
            TypeKind::Primitive(_) => return Vec::new(),
            TypeKind::Array(_) => return vec![self.well_known().object],
            TypeKind::Class(_) | TypeKind::Interface(_) => {}
        }

        let mut seen = HashSet::from([desc.id()]);
        let mut out = Vec::new();

        let mut chain = Vec::new();
        let mut next = desc.superclass();
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            out.push(id);
            let superclass = self.descriptor(id);
            next = superclass.superclass();
            chain.push(superclass);
        }

        self.push_interfaces(desc.declared_interfaces(), &mut seen, &mut out);
        for superclass in &chain {
            self.push_interfaces(superclass.declared_interfaces(), &mut seen, &mut out);
        }
        out
    }

    fn push_interfaces(&self, interfaces: &[TypeId], seen: &mut HashSet<TypeId>, out: &mut Vec<TypeId>) {
        for &id in interfaces {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            let iface = self.descriptor(id);
            self.push_interfaces(iface.declared_interfaces(), seen, out);
        }
    }
}
