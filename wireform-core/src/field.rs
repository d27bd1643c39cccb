//! Field descriptors for composite types
//!
//! A type opts into synthesized codecs by implementing [`Record`]: a
//! `Default` construction point plus one [`FieldDef`] per wire member. The
//! order index controls on-wire layout; declaration order only breaks
//! ties. Accessors are plain `fn` pointers, so the whole declaration is
//! resolved at compile time with no runtime introspection.
//!
//! ```
//! use wireform_core::{FieldDef, FieldOptions, Record};
//!
//! #[derive(Default)]
//! struct Header {
//!     version: u16,
//!     length: u32,
//! }
//!
//! impl Record for Header {
//!     fn fields() -> Vec<FieldDef<Self>> {
//!         vec![
//!             FieldDef::leaf(0, "version", FieldOptions::default(), |h: &Self| &h.version, |h, v| h.version = v),
//!             FieldDef::leaf(1, "length", FieldOptions::default(), |h: &Self| &h.length, |h, v| h.length = v),
//!         ]
//!     }
//! }
//! ```

use crate::cursor::Cursor;
use crate::options::FieldOptions;
use crate::registry::CodecRegistry;
use crate::sink::Sink;
use crate::Result;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// A type whose codec the registry synthesizes from field metadata
pub trait Record: Default + 'static {
    /// The declared field descriptors, one per wire member
    ///
    /// Enumerated once, at first synthesis.
    fn fields() -> Vec<FieldDef<Self>>;
}

pub(crate) type ReadFieldFn<T> =
    Box<dyn Fn(&CodecRegistry, &mut Cursor<'_>, &mut T) -> Result<()>>;
pub(crate) type WriteFieldFn<T> = Box<dyn Fn(&CodecRegistry, &mut Sink<'_>, &T) -> Result<()>>;

/// One member's wire declaration: order, options, and typed accessors
pub struct FieldDef<T> {
    /// Order index; lower values encode earlier
    pub order: u32,
    /// Member name, used in diagnostics only
    pub name: &'static str,
    /// Wire options the member's codec is invoked with
    pub options: FieldOptions,
    /// Resolves (or synthesizes) the member type's codec at synthesis time
    pub(crate) ensure: fn(&CodecRegistry) -> Result<()>,
    pub(crate) read: ReadFieldFn<T>,
    pub(crate) write: WriteFieldFn<T>,
}

impl<T: 'static> FieldDef<T> {
    /// Descriptor for a member whose type has a registered leaf codec
    pub fn leaf<F: 'static>(
        order: u32,
        name: &'static str,
        options: FieldOptions,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        let read_options = options.clone();
        let write_options = options.clone();
        Self {
            order,
            name,
            options,
            ensure: |registry| registry.ensure_resolvable::<F>(),
            read: Box::new(move |registry, cursor, target| {
                let value = registry.decode_with::<F>(cursor, &read_options)?;
                set(target, value);
                Ok(())
            }),
            write: Box::new(move |registry, sink, source| {
                registry.encode_with::<F>(sink, get(source), &write_options)
            }),
        }
    }

    /// Descriptor for a member that is itself a [`Record`]
    ///
    /// The member type's codec is synthesized during the parent's
    /// synthesis, so a cyclic record graph is rejected there rather than
    /// recursing at decode time.
    pub fn record<F: Record>(
        order: u32,
        name: &'static str,
        options: FieldOptions,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        let read_options = options.clone();
        let write_options = options.clone();
        Self {
            order,
            name,
            options,
            ensure: |registry| registry.synthesize_now::<F>(),
            read: Box::new(move |registry, cursor, target| {
                let value = registry.decode_with::<F>(cursor, &read_options)?;
                set(target, value);
                Ok(())
            }),
            write: Box::new(move |registry, sink, source| {
                registry.encode_with::<F>(sink, get(source), &write_options)
            }),
        }
    }
}
