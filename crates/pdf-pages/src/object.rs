//! Small helpers over `lopdf` objects.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Maximum page-tree depth walked when looking up inherited attributes.
const MAX_TREE_DEPTH: usize = 32;

/// Numeric value of an Integer or Real object.
pub fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// A Real object from a point value.
pub fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Follow a single indirect reference, if any.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Follow a single indirect reference, failing when it dangles.
pub fn dereference<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// Read a rectangle `[x0 y0 x1 y1]`, normalizing reversed corners.
pub fn rectangle(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let Object::Array(items) = resolve(doc, obj)? else {
        return None;
    };
    if items.len() != 4 {
        return None;
    }
    let mut values = [0.0; 4];
    for (slot, item) in values.iter_mut().zip(items) {
        *slot = number(resolve(doc, item)?)?;
    }
    let [x0, y0, x1, y1] = values;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

/// A rectangle as a PDF array.
pub fn rectangle_object(rect: [f64; 4]) -> Object {
    Object::Array(rect.iter().map(|&v| real(v)).collect())
}

/// Look up `key` on a page, walking up through `/Parent` when absent.
pub fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict: &Dictionary = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let Ok(Object::Reference(parent)) = dict.get(b"Parent") else {
            return None;
        };
        dict = doc.get_dictionary(*parent).ok()?;
    }
    None
}
