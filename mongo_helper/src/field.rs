//! Per-field metadata of a model.

use std::fmt;

bitflags! {
    /// Properties of a single serialized model field.
    ///
    /// ```
    /// # extern crate mongo_helper;
    /// #
    /// # use mongo_helper::field::FieldFlags;
    /// #
    /// # fn main() {
    /// let flags = FieldFlags::UNIQUE | FieldFlags::MUTABLE;
    /// assert!(flags.contains(FieldFlags::UNIQUE));
    /// assert!(!FieldFlags::empty().contains(FieldFlags::MUTABLE));
    /// # }
    /// ```
    pub struct FieldFlags: u8 {
        /// Values of this field are expected to be unique across
        /// the collection.
        const UNIQUE  = 0b0000_0001;
        /// Update operations may change the value of this field.
        const MUTABLE = 0b0000_0010;
    }
}

/// Describes one field of a model, under its serialized (BSON) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// The key under which the field appears in documents.
    name: String,
    /// Uniqueness and mutability.
    flags: FieldFlags,
}

impl FieldDescriptor {
    /// Creates a descriptor from a field name and its properties.
    pub fn new<S: Into<String>>(name: S, unique: bool, mutable: bool) -> Self {
        let mut flags = FieldFlags::empty();
        flags.set(FieldFlags::UNIQUE, unique);
        flags.set(FieldFlags::MUTABLE, mutable);

        FieldDescriptor { name: name.into(), flags }
    }

    /// Creates a descriptor from a field name and a ready-made set of flags.
    pub fn with_flags<S: Into<String>>(name: S, flags: FieldFlags) -> Self {
        FieldDescriptor { name: name.into(), flags }
    }

    /// The serialized name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether values of this field must be unique within the collection.
    pub fn is_unique(&self) -> bool {
        self.flags.contains(FieldFlags::UNIQUE)
    }

    /// Whether update operations may touch this field.
    pub fn is_mutable(&self) -> bool {
        self.flags.contains(FieldFlags::MUTABLE)
    }

    /// All properties of the field at once.
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)?;

        if self.is_unique() {
            f.write_str(" [unique]")?;
        }
        if !self.is_mutable() {
            f.write_str(" [immutable]")?;
        }

        Ok(())
    }
}
