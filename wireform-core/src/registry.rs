//! Codec resolution, synthesis and caching
//!
//! A [`CodecRegistry`] is an explicitly owned instance, not process-wide
//! state: tests build one per case, callers pass theirs around. Resolution
//! for a requested type runs exact match, then the caller-declared
//! fallback chain in order, then synthesis from [`Record`] field metadata;
//! the first hit wins. Synthesized codecs are cached under the exact type,
//! so repeat requests are O(1) and behaviorally identical.
//!
//! The cache sits behind a `RefCell`, which makes the registry
//! single-threaded by construction; callers wanting cross-thread use
//! serialize access themselves.

use crate::cursor::Cursor;
use crate::field::Record;
use crate::options::FieldOptions;
use crate::primitive;
use crate::sink::Sink;
use crate::error::WireError;
use crate::Result;
use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{type_name, Any, TypeId};
use core::cell::RefCell;
use bytes::Bytes;
use hashbrown::HashMap;

#[cfg(feature = "logging")]
use tracing::debug;

type ErasedDecodeFn =
    Box<dyn Fn(&CodecRegistry, &mut Cursor<'_>, &FieldOptions) -> Result<Box<dyn Any>>>;
type ErasedEncodeFn =
    Box<dyn Fn(&CodecRegistry, &mut Sink<'_>, &dyn Any, &FieldOptions) -> Result<()>>;

/// A paired decode/encode routine bound to exactly one type
pub struct Codec {
    type_id: TypeId,
    type_name: &'static str,
    decode: ErasedDecodeFn,
    encode: ErasedEncodeFn,
}

impl Codec {
    /// The name of the type this codec is bound to
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The identity of the type this codec is bound to
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Decode one value, boxed
    pub fn decode_value(
        &self,
        registry: &CodecRegistry,
        cursor: &mut Cursor<'_>,
        options: &FieldOptions,
    ) -> Result<Box<dyn Any>> {
        (self.decode)(registry, cursor, options)
    }

    /// Encode one value from behind `dyn Any`
    pub fn encode_value(
        &self,
        registry: &CodecRegistry,
        sink: &mut Sink<'_>,
        value: &dyn Any,
        options: &FieldOptions,
    ) -> Result<()> {
        (self.encode)(registry, sink, value, options)
    }
}

impl core::fmt::Debug for Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Codec")
            .field("type_name", &self.type_name)
            .finish()
    }
}

type SynthFn = fn(&CodecRegistry) -> Result<Rc<Codec>>;

/// Resolves or synthesizes a [`Codec`] for any requested type
pub struct CodecRegistry {
    codecs: RefCell<HashMap<TypeId, Rc<Codec>>>,
    fallbacks: HashMap<TypeId, Vec<TypeId>>,
    synthesizers: RefCell<HashMap<TypeId, SynthFn>>,
    in_progress: RefCell<Vec<(TypeId, &'static str)>>,
}

impl CodecRegistry {
    /// Registry with the primitive codec set installed
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitive::install(&mut registry);
        registry
    }

    /// Registry with nothing registered, for callers replacing primitives
    pub fn empty() -> Self {
        Self {
            codecs: RefCell::new(HashMap::new()),
            fallbacks: HashMap::new(),
            synthesizers: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(Vec::new()),
        }
    }

    /// Register a leaf codec for a `Copy` type; first registration wins
    pub fn register_leaf<T: Copy + 'static>(
        &mut self,
        read: fn(&mut Cursor<'_>, &FieldOptions) -> Result<T>,
        write: fn(&mut Sink<'_>, T, &FieldOptions) -> Result<()>,
    ) {
        self.insert_first_wins(Codec {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            decode: Box::new(move |_registry, cursor, options| {
                Ok(Box::new(read(cursor, options)?) as Box<dyn Any>)
            }),
            encode: Box::new(move |_registry, sink, value, options| {
                let value = value
                    .downcast_ref::<T>()
                    .copied()
                    .ok_or_else(|| type_mismatch::<T>(value))?;
                write(sink, value, options)
            }),
        });
    }

    /// Register a leaf codec that encodes by reference; first registration
    /// wins
    pub fn register_leaf_ref<T: 'static>(
        &mut self,
        read: fn(&mut Cursor<'_>, &FieldOptions) -> Result<T>,
        write: fn(&mut Sink<'_>, &T, &FieldOptions) -> Result<()>,
    ) {
        self.insert_first_wins(Codec {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            decode: Box::new(move |_registry, cursor, options| {
                Ok(Box::new(read(cursor, options)?) as Box<dyn Any>)
            }),
            encode: Box::new(move |_registry, sink, value, options| {
                let value = value
                    .downcast_ref::<T>()
                    .ok_or_else(|| type_mismatch::<T>(value))?;
                write(sink, value, options)
            }),
        });
    }

    fn insert_first_wins(&mut self, codec: Codec) {
        let mut codecs = self.codecs.borrow_mut();
        if codecs.contains_key(&codec.type_id) {
            #[cfg(feature = "logging")]
            debug!(
                "codec for {} already registered; first registration wins",
                codec.type_name
            );
            return;
        }
        codecs.insert(codec.type_id, Rc::new(codec));
    }

    /// Make a [`Record`] type known; its codec is synthesized lazily on
    /// first use
    ///
    /// Nested record members register themselves through their parent's
    /// field descriptors, so only root types need an explicit call.
    pub fn register_record<T: Record>(&mut self) {
        if self.codecs.borrow().contains_key(&TypeId::of::<T>()) {
            return;
        }
        self.synthesizers
            .borrow_mut()
            .entry(TypeId::of::<T>())
            .or_insert(synthesize::<T> as SynthFn);
    }

    /// Declare the fallback chain consulted when `T` has no exact codec
    ///
    /// Chains are explicit and caller-owned: resolution tries each entry
    /// in declaration order and returns the first *registered* match. A
    /// codec found through a chain still produces its own bound type, so
    /// chain hits are for the type-erased path and for capability types
    /// the caller converts from.
    pub fn register_fallback<T: 'static>(&mut self, chain: Vec<TypeId>) {
        self.fallbacks.insert(TypeId::of::<T>(), chain);
    }

    /// True if an exact codec is registered or cached for `T`
    pub fn has_codec<T: 'static>(&self) -> bool {
        self.codecs.borrow().contains_key(&TypeId::of::<T>())
    }

    /// Resolve a codec: exact type, then fallback chain, then synthesis
    pub fn resolve(&self, type_id: TypeId) -> Result<Rc<Codec>> {
        if let Some(codec) = self.codecs.borrow().get(&type_id) {
            return Ok(codec.clone());
        }
        if let Some(chain) = self.fallbacks.get(&type_id) {
            let codecs = self.codecs.borrow();
            for candidate in chain {
                if let Some(codec) = codecs.get(candidate) {
                    #[cfg(feature = "logging")]
                    debug!("resolved {type_id:?} through fallback to {}", codec.type_name);
                    return Ok(codec.clone());
                }
            }
        }
        let synth = self.synthesizers.borrow().get(&type_id).copied();
        if let Some(synth) = synth {
            return synth(self);
        }
        Err(WireError::Configuration(format!(
            "no codec registered or synthesizable for {type_id:?}"
        )))
    }

    fn resolve_named(&self, type_id: TypeId, name: &'static str) -> Result<Rc<Codec>> {
        self.resolve(type_id).map_err(|err| match err {
            WireError::Configuration(_) if !self.synthesizers.borrow().contains_key(&type_id) => {
                WireError::Configuration(format!(
                    "no codec registered or synthesizable for {name}"
                ))
            }
            other => other,
        })
    }

    /// Check at synthesis time that a member type will resolve
    pub(crate) fn ensure_resolvable<F: 'static>(&self) -> Result<()> {
        let type_id = TypeId::of::<F>();
        if self.codecs.borrow().contains_key(&type_id)
            || self.synthesizers.borrow().contains_key(&type_id)
        {
            return Ok(());
        }
        if let Some(chain) = self.fallbacks.get(&type_id) {
            let codecs = self.codecs.borrow();
            if chain.iter().any(|candidate| codecs.contains_key(candidate)) {
                return Ok(());
            }
        }
        Err(WireError::Configuration(format!(
            "no codec registered or synthesizable for member type {}",
            type_name::<F>()
        )))
    }

    /// Synthesize a record codec immediately (nested members do this so
    /// cycles surface during the parent's synthesis)
    pub(crate) fn synthesize_now<T: Record>(&self) -> Result<()> {
        synthesize::<T>(self).map(|_| ())
    }

    /// Decode a value of `T` with default field options
    pub fn decode<T: 'static>(&self, cursor: &mut Cursor<'_>) -> Result<T> {
        self.decode_with(cursor, &FieldOptions::default())
    }

    /// Decode a value of `T` under explicit field options
    pub fn decode_with<T: 'static>(
        &self,
        cursor: &mut Cursor<'_>,
        options: &FieldOptions,
    ) -> Result<T> {
        let codec = self.resolve_named(TypeId::of::<T>(), type_name::<T>())?;
        let value = codec.decode_value(self, cursor, options)?;
        value.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            WireError::Configuration(format!(
                "codec resolved for {} produces {}; use the type-erased path",
                type_name::<T>(),
                codec.type_name()
            ))
        })
    }

    /// Encode a value of `T` with default field options
    pub fn encode<T: 'static>(&self, sink: &mut Sink<'_>, value: &T) -> Result<()> {
        self.encode_with(sink, value, &FieldOptions::default())
    }

    /// Encode a value of `T` under explicit field options
    pub fn encode_with<T: 'static>(
        &self,
        sink: &mut Sink<'_>,
        value: &T,
        options: &FieldOptions,
    ) -> Result<()> {
        let codec = self.resolve_named(TypeId::of::<T>(), type_name::<T>())?;
        codec.encode_value(self, sink, value, options)
    }

    /// Encode a value of `T` into a freshly allocated, frozen buffer
    ///
    /// Convenience for callers that hand the result across an API
    /// boundary and want cheap clones.
    pub fn encode_to_bytes<T: 'static>(&self, value: &T) -> Result<Bytes> {
        let mut buf = Vec::new();
        let mut sink = Sink::new(&mut buf);
        self.encode(&mut sink, value)?;
        Ok(Bytes::from(buf))
    }

    /// Decode a value known only by type identity
    pub fn decode_erased(
        &self,
        type_id: TypeId,
        cursor: &mut Cursor<'_>,
    ) -> Result<Box<dyn Any>> {
        let codec = self.resolve(type_id)?;
        codec.decode_value(self, cursor, &FieldOptions::default())
    }

    /// Encode a value known only behind `dyn Any`
    ///
    /// The type identity comes from the value itself.
    pub fn encode_erased(&self, sink: &mut Sink<'_>, value: &dyn Any) -> Result<()> {
        let codec = self.resolve(value.type_id())?;
        codec.encode_value(self, sink, value, &FieldOptions::default())
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn type_mismatch<T: 'static>(value: &dyn Any) -> WireError {
    WireError::Configuration(format!(
        "codec for {} received a value of TypeId {:?}",
        type_name::<T>(),
        value.type_id()
    ))
}

/// Synthesize and cache a codec for `T` from its field descriptors
fn synthesize<T: Record>(registry: &CodecRegistry) -> Result<Rc<Codec>> {
    let type_id = TypeId::of::<T>();
    if let Some(codec) = registry.codecs.borrow().get(&type_id) {
        return Ok(codec.clone());
    }

    {
        let mut stack = registry.in_progress.borrow_mut();
        if stack.iter().any(|(seen, _)| *seen == type_id) {
            let mut path = String::new();
            for (_, name) in stack.iter() {
                path.push_str(name);
                path.push_str(" -> ");
            }
            path.push_str(type_name::<T>());
            return Err(WireError::Configuration(format!(
                "cyclic record graph: {path}"
            )));
        }
        stack.push((type_id, type_name::<T>()));
    }

    let built = compose::<T>(registry);
    registry.in_progress.borrow_mut().pop();
    let codec = Rc::new(built?);

    #[cfg(feature = "logging")]
    debug!(
        "synthesized codec for {} ({} fields known)",
        type_name::<T>(),
        registry.codecs.borrow().len()
    );

    registry
        .codecs
        .borrow_mut()
        .insert(type_id, codec.clone());
    Ok(codec)
}

fn compose<T: Record>(registry: &CodecRegistry) -> Result<Codec> {
    let mut fields = T::fields();
    // Stable sort: equal order indexes keep declaration order
    fields.sort_by_key(|field| field.order);

    for field in &fields {
        (field.ensure)(registry).map_err(|err| match err {
            WireError::Configuration(msg) => WireError::Configuration(format!(
                "{}.{}: {msg}",
                type_name::<T>(),
                field.name
            )),
            other => other,
        })?;
    }

    let fields = Rc::new(fields);
    let decode_fields = Rc::clone(&fields);
    let decode: ErasedDecodeFn = Box::new(move |registry, cursor, _options| {
        let mut value = T::default();
        for field in decode_fields.iter() {
            (field.read)(registry, cursor, &mut value)?;
        }
        Ok(Box::new(value) as Box<dyn Any>)
    });
    let encode: ErasedEncodeFn = Box::new(move |registry, sink, value, _options| {
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(|| type_mismatch::<T>(value))?;
        for field in fields.iter() {
            (field.write)(registry, sink, value)?;
        }
        Ok(())
    });

    Ok(Codec {
        type_id: TypeId::of::<T>(),
        type_name: type_name::<T>(),
        decode,
        encode,
    })
}
