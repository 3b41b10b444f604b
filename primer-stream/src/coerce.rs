// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime type bridging between streams of related element types.
//!
//! Components are often wired together through type-erased [`Handle`]s. A
//! [`CoercionRegistry`] records which handle types produce or accept which element
//! types, and which element conversions exist, so a handle can later be viewed as
//! a `StreamSource<T>` or an `Observer<T>` for some requested `T`.
//!
//! - [`CoercionRegistry::register_source`]: handles of type `H` produce `E`
//! - [`CoercionRegistry::register_sink`]: handles of type `H` accept `E`
//! - [`CoercionRegistry::register_upcast`]: `From` converts into `To`
//!
//! Lookup walks the capabilities of the handle's concrete type in registration order.
//! A capability whose element type matches exactly is returned as is; otherwise a
//! registered conversion yields an adapter that converts every value and forwards
//! errors and completion unchanged. No match is a normal `None`.
//!
//! ## Example
//!
//! ```
//! use primer_core::{StreamItem, StreamSource, Subject};
//! use primer_stream::{CoercionRegistry, Handle};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = CoercionRegistry::new();
//! registry.register_source::<Subject<u8>, u8>();
//! registry.register_upcast::<u8, u32>();
//!
//! let subject = Subject::<u8>::new();
//! let handle: Handle = Arc::new(subject.clone());
//!
//! let widened = registry.coerce::<u32>(&handle).expect("u8 widens to u32");
//! let mut stream = widened.subscribe();
//! subject.next(7).unwrap();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(7u32)));
//! assert!(registry.coerce::<String>(&handle).is_none());
//! # }
//! ```

use futures::StreamExt;
use parking_lot::RwLock;
use primer_core::{ItemStream, Observer, PrimerError, StreamSource};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased component reference.
pub type Handle = Arc<dyn Any + Send + Sync>;

/// Boxed `Arc<dyn StreamSource<E>>` or `Arc<dyn Observer<E>>` for some `E`.
type Erased = Box<dyn Any + Send>;

type Opener = Arc<dyn Fn(&Handle) -> Option<Erased> + Send + Sync>;
type Adapter = Arc<dyn Fn(Erased) -> Option<Erased> + Send + Sync>;

#[derive(Clone)]
struct Capability {
    element: TypeId,
    open: Opener,
}

#[derive(Clone)]
struct Conversion {
    // Arc<dyn StreamSource<From>> -> Arc<dyn StreamSource<To>>
    source: Adapter,
    // Arc<dyn Observer<To>> -> Arc<dyn Observer<From>>
    sink: Adapter,
}

#[derive(Clone, Copy)]
enum Direction {
    Source,
    Sink,
}

#[derive(Default)]
struct RegistryState {
    sources: HashMap<TypeId, Vec<Capability>>,
    sinks: HashMap<TypeId, Vec<Capability>>,
    conversions: HashMap<(TypeId, TypeId), Conversion>,
}

/// Capability table used to view type-erased handles as typed sources and sinks.
///
/// Registries are plain values; share one behind an `Arc` where needed.
#[derive(Default)]
pub struct CoercionRegistry {
    state: RwLock<RegistryState>,
}

impl CoercionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that handles holding an `H` are streams of `E`.
    pub fn register_source<H, E>(&self)
    where
        H: StreamSource<E> + 'static,
        E: 'static,
    {
        let open: Opener = Arc::new(|handle: &Handle| {
            let concrete = Arc::clone(handle).downcast::<H>().ok()?;
            let source: Arc<dyn StreamSource<E>> = concrete;
            Some(Box::new(source) as Erased)
        });

        self.state
            .write()
            .sources
            .entry(TypeId::of::<H>())
            .or_default()
            .push(Capability {
                element: TypeId::of::<E>(),
                open,
            });
    }

    /// Declares that handles holding an `H` accept values of `E`.
    pub fn register_sink<H, E>(&self)
    where
        H: Observer<E> + 'static,
        E: 'static,
    {
        let open: Opener = Arc::new(|handle: &Handle| {
            let concrete = Arc::clone(handle).downcast::<H>().ok()?;
            let sink: Arc<dyn Observer<E>> = concrete;
            Some(Box::new(sink) as Erased)
        });

        self.state
            .write()
            .sinks
            .entry(TypeId::of::<H>())
            .or_default()
            .push(Capability {
                element: TypeId::of::<E>(),
                open,
            });
    }

    /// Declares that values of `From` convert into `To`.
    ///
    /// Enables streams of `From` to be read as streams of `To`, and sinks of `To`
    /// to be fed with values of `From`.
    pub fn register_upcast<From, To>(&self)
    where
        From: Into<To> + Send + 'static,
        To: Send + 'static,
    {
        let source: Adapter = Arc::new(|erased: Erased| {
            let inner = *erased.downcast::<Arc<dyn StreamSource<From>>>().ok()?;
            let adapted: Arc<dyn StreamSource<To>> = Arc::new(ConvertedSource {
                inner,
                _target: PhantomData::<fn() -> To>,
            });
            Some(Box::new(adapted) as Erased)
        });
        let sink: Adapter = Arc::new(|erased: Erased| {
            let inner = *erased.downcast::<Arc<dyn Observer<To>>>().ok()?;
            let adapted: Arc<dyn Observer<From>> = Arc::new(ConvertingObserver {
                inner,
                _source: PhantomData::<fn(From)>,
            });
            Some(Box::new(adapted) as Erased)
        });

        self.state.write().conversions.insert(
            (TypeId::of::<From>(), TypeId::of::<To>()),
            Conversion { source, sink },
        );
    }

    /// Views `handle` as a stream of `T`, if any registered capability allows it.
    pub fn coerce<T: 'static>(&self, handle: &Handle) -> Option<Arc<dyn StreamSource<T>>> {
        if let Some(direct) = handle.downcast_ref::<Arc<dyn StreamSource<T>>>() {
            return Some(Arc::clone(direct));
        }

        let target = TypeId::of::<T>();
        let (capabilities, conversions) = self.snapshot(handle, Direction::Source);

        for capability in capabilities {
            let adapted = if capability.element == target {
                (capability.open)(handle)
            } else if let Some(conversion) = conversions.get(&(capability.element, target)) {
                (capability.open)(handle).and_then(|native| (conversion.source)(native))
            } else {
                None
            };

            let source =
                adapted.and_then(|erased| erased.downcast::<Arc<dyn StreamSource<T>>>().ok());
            if let Some(source) = source {
                return Some(*source);
            }
        }

        debug!(
            "no stream capability of {} for handle",
            std::any::type_name::<T>()
        );
        None
    }

    /// Views `handle` as a sink of `T`, if any registered capability allows it.
    pub fn coerce_observer<T: 'static>(&self, handle: &Handle) -> Option<Arc<dyn Observer<T>>> {
        if let Some(direct) = handle.downcast_ref::<Arc<dyn Observer<T>>>() {
            return Some(Arc::clone(direct));
        }

        let offered = TypeId::of::<T>();
        let (capabilities, conversions) = self.snapshot(handle, Direction::Sink);

        for capability in capabilities {
            let adapted = if capability.element == offered {
                (capability.open)(handle)
            } else if let Some(conversion) = conversions.get(&(offered, capability.element)) {
                (capability.open)(handle).and_then(|native| (conversion.sink)(native))
            } else {
                None
            };

            let sink = adapted.and_then(|erased| erased.downcast::<Arc<dyn Observer<T>>>().ok());
            if let Some(sink) = sink {
                return Some(*sink);
            }
        }

        debug!(
            "no sink capability of {} for handle",
            std::any::type_name::<T>()
        );
        None
    }

    // Copies out what a lookup needs so openers run without the lock held.
    fn snapshot(
        &self,
        handle: &Handle,
        direction: Direction,
    ) -> (Vec<Capability>, HashMap<(TypeId, TypeId), Conversion>) {
        let concrete = Any::type_id(&**handle);
        let state = self.state.read();
        let table = match direction {
            Direction::Source => &state.sources,
            Direction::Sink => &state.sinks,
        };
        let capabilities = table.get(&concrete).cloned().unwrap_or_default();
        (capabilities, state.conversions.clone())
    }
}

struct ConvertedSource<From, To> {
    inner: Arc<dyn StreamSource<From>>,
    _target: PhantomData<fn() -> To>,
}

impl<From, To> StreamSource<To> for ConvertedSource<From, To>
where
    From: Into<To> + Send + 'static,
    To: Send + 'static,
{
    fn subscribe(&self) -> ItemStream<To> {
        self.inner
            .subscribe()
            .map(|item| item.map(<From as Into<To>>::into))
            .boxed()
    }
}

struct ConvertingObserver<From, To> {
    inner: Arc<dyn Observer<To>>,
    _source: PhantomData<fn(From)>,
}

impl<From, To> Observer<From> for ConvertingObserver<From, To>
where
    From: Into<To>,
{
    fn on_next(&self, value: From) {
        self.inner.on_next(value.into());
    }

    fn on_error(&self, error: PrimerError) {
        self.inner.on_error(error);
    }

    fn on_completed(&self) {
        self.inner.on_completed();
    }
}
