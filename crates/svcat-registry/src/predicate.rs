use svcat_object_model::ObjectError;
use svcat_object_model::ObjectMeta;
use svcat_object_model::core::Object;
use svcat_object_model::{fields, labels};

/// extracts the label and field sets an object is selected by
pub type AttrFunc = fn(&dyn Object) -> Result<(labels::Set, fields::Set), ObjectError>;

/// builds the predicate used to filter list and watch results
pub type PredicateFunc = fn(labels::Selector, fields::Selector) -> SelectionPredicate;

/// Label and field selectors bound to the attribute extraction of a resource type
#[derive(Debug, Clone)]
pub struct SelectionPredicate {
    pub label: labels::Selector,
    pub field: fields::Selector,
    pub get_attrs: AttrFunc,
}

impl SelectionPredicate {
    pub fn new(label: labels::Selector, field: fields::Selector, get_attrs: AttrFunc) -> Self {
        Self {
            label,
            field,
            get_attrs,
        }
    }

    /// true if neither selector restricts anything
    pub fn empty(&self) -> bool {
        self.label.is_empty() && self.field.is_empty()
    }

    /// both selectors must match. Attributes are not extracted for an empty predicate.
    pub fn matches(&self, obj: &dyn Object) -> Result<bool, ObjectError> {
        if self.empty() {
            return Ok(true);
        }
        let (label_set, field_set) = (self.get_attrs)(obj)?;
        Ok(self.label.matches(&label_set) && self.field.matches(&field_set))
    }
}

/// fields every resource exposes from its metadata
pub fn object_meta_fields_set(meta: &ObjectMeta, has_namespace_field: bool) -> fields::Set {
    let mut set = fields::Set::new();
    set.insert("metadata.name", meta.name.as_str());
    if has_namespace_field {
        set.insert("metadata.namespace", meta.namespace.as_str());
    }
    set
}

/// adds the resource specific `source` fields on top of the metadata fields
pub fn merge_fields_sets(source: fields::Set, fragment: Option<fields::Set>) -> fields::Set {
    match fragment {
        Some(fragment) => source.merge(fragment),
        None => source,
    }
}
