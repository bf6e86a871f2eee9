/// Declares one RPC interface and emits, from a single block:
///
/// 1. a plain trait (the server-side interface contract), dyn-safe via
///    boxed futures so it composes with `Arc<dyn Trait>` the same way
///    `jgrpc-discovery`'s `Directory` does;
/// 2. a dispatch adapter implementing both `tower::Service<RequestRecord>`
///    and `jgrpc_server::DispatchEntry`, matching on method name and
///    decoding each argument through `serde_value`;
/// 3. a client stub whose methods build a `RequestRecord`, call
///    `ClientEngine::call`, and decode the reply. An `rpc` line is the sync
///    path: an `async fn` that awaits the reply and returns the unwrapped
///    value. An `async rpc` line is the handle path: a plain `fn` that
///    returns a [`crate::CallHandle`] immediately, spawning the call onto
///    its own task (spec.md §4.7's "declared return type is a future-like
///    handle" rule, realized here as an explicit per-method marker since
///    Rust macros can't pattern-match the shape of an already-captured
///    `ty` fragment).
///
/// This is this target's substitute for a reflective proxy factory: Rust
/// has no runtime equivalent, so the per-interface boilerplate is
/// generated at compile time from one declaration instead.
#[macro_export]
macro_rules! rpc_service {
    (
        service $service:ident {
            trait = $trait_name:ident;
            dispatch = $dispatch_name:ident;
            client = $client_name:ident;
            interface = $interface:expr;
            $(
                $($async_marker:tt)? rpc $method:ident ( $( $param:ident : $param_ty:ty ),* $(,)? ) -> $ret:ty;
            )*
        }
    ) => {
        #[doc = concat!("Server-side interface for `", $interface, "`.")]
        pub trait $trait_name: Send + Sync + 'static {
            $(
                fn $method<'a>(
                    &'a self,
                    $( $param: $param_ty ),*
                ) -> ::core::pin::Pin<::std::boxed::Box<dyn ::core::future::Future<Output = $ret> + Send + 'a>>;
            )*
        }

        #[doc = concat!("Generated dispatch adapter for `", $interface, "`.")]
        pub struct $dispatch_name<T> {
            inner: ::std::sync::Arc<T>,
        }

        impl<T> ::core::clone::Clone for $dispatch_name<T> {
            fn clone(&self) -> Self {
                Self { inner: ::std::sync::Arc::clone(&self.inner) }
            }
        }

        impl<T> $dispatch_name<T> {
            pub fn new(inner: ::std::sync::Arc<T>) -> Self {
                Self { inner }
            }
        }

        impl<T> $crate::tower::Service<$crate::RequestRecord> for $dispatch_name<T>
        where
            T: $trait_name,
        {
            type Response = $crate::ResponseRecord;
            type Error = ::core::convert::Infallible;
            #[allow(clippy::type_complexity)]
            type Future = ::core::pin::Pin<
                ::std::boxed::Box<
                    dyn ::core::future::Future<Output = ::core::result::Result<Self::Response, Self::Error>>
                        + Send,
                >,
            >;

            fn poll_ready(
                &mut self,
                _cx: &mut ::core::task::Context<'_>,
            ) -> ::core::task::Poll<::core::result::Result<(), Self::Error>> {
                ::core::task::Poll::Ready(Ok(()))
            }

            fn call(&mut self, request: $crate::RequestRecord) -> Self::Future {
                let inner = ::std::sync::Arc::clone(&self.inner);
                ::std::boxed::Box::pin(async move {
                    let correlation_id = request.correlation_id.clone();
                    let mut arguments = request.arguments.into_iter();
                    match request.method.as_str() {
                        $(
                            stringify!($method) => {
                                $(
                                    let $param: $param_ty = match arguments.next() {
                                        ::core::option::Option::Some(value) => {
                                            match $crate::serde_value::from_value(value) {
                                                ::core::result::Result::Ok(v) => v,
                                                ::core::result::Result::Err(err) => {
                                                    return ::core::result::Result::Ok(
                                                        $crate::ResponseRecord::failed(correlation_id, err.to_string()),
                                                    );
                                                }
                                            }
                                        }
                                        ::core::option::Option::None => {
                                            return ::core::result::Result::Ok($crate::ResponseRecord::failed(
                                                correlation_id,
                                                concat!("missing argument: ", stringify!($param)),
                                            ));
                                        }
                                    };
                                )*
                                let result = inner.$method($( $param ),*).await;
                                match $crate::serde_value::to_value(result) {
                                    ::core::result::Result::Ok(value) => ::core::result::Result::Ok(
                                        $crate::ResponseRecord::ok(correlation_id, ::core::option::Option::Some(value)),
                                    ),
                                    ::core::result::Result::Err(err) => ::core::result::Result::Ok(
                                        $crate::ResponseRecord::failed(correlation_id, err.to_string()),
                                    ),
                                }
                            }
                        )*
                        other => ::core::result::Result::Ok($crate::ResponseRecord::failed(
                            correlation_id,
                            ::std::format!("no such method: {other}"),
                        )),
                    }
                })
            }
        }

        impl<T> $crate::DispatchEntry for $dispatch_name<T>
        where
            T: $trait_name,
        {
            fn interface_name(&self) -> &'static str {
                $interface
            }

            fn dispatch<'a>(
                &'a self,
                request: $crate::RequestRecord,
            ) -> ::core::pin::Pin<::std::boxed::Box<dyn ::core::future::Future<Output = $crate::ResponseRecord> + Send + 'a>>
            {
                use $crate::tower::ServiceExt;
                let service = ::core::clone::Clone::clone(self);
                ::std::boxed::Box::pin(async move {
                    match service.oneshot(request).await {
                        ::core::result::Result::Ok(response) => response,
                        ::core::result::Result::Err(infallible) => match infallible {},
                    }
                })
            }
        }

        #[doc = concat!("Generated client stub for `", $interface, "`.")]
        #[derive(::core::clone::Clone)]
        pub struct $client_name {
            engine: ::std::sync::Arc<$crate::ClientEngine>,
        }

        impl $client_name {
            pub fn new(engine: ::std::sync::Arc<$crate::ClientEngine>) -> Self {
                Self { engine }
            }
        }

        $(
            $crate::__rpc_service_stub_method! {
                $client_name; $interface; $method; $ret;
                [ $( $param : $param_ty ),* ];
                $($async_marker)?
            }
        )*

        impl ::core::cmp::PartialEq for $client_name {
            fn eq(&self, other: &Self) -> bool {
                ::std::sync::Arc::ptr_eq(&self.engine, &other.engine)
            }
        }

        impl ::core::cmp::Eq for $client_name {}

        impl ::core::fmt::Display for $client_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}({})", stringify!($client_name), $interface)
            }
        }

        impl ::core::hash::Hash for $client_name {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                (::std::sync::Arc::as_ptr(&self.engine) as *const () as usize).hash(state);
            }
        }
    };
}

/// Emits one client stub method, dispatching on the optional leading
/// `async` marker captured by [`rpc_service`]. Not part of the public API;
/// called only from within a `rpc_service!` expansion.
#[doc(hidden)]
#[macro_export]
macro_rules! __rpc_service_stub_method {
    // Handle path: returns a `CallHandle` immediately, the call runs on its
    // own spawned task.
    (
        $client_name:ident; $interface:expr; $method:ident; $ret:ty;
        [ $( $param:ident : $param_ty:ty ),* ];
        async
    ) => {
        impl $client_name {
            #[doc = concat!("Starts `", stringify!($method), "` and returns a handle to its reply.")]
            pub fn $method(
                &self,
                $( $param: $param_ty ),*
            ) -> $crate::CallHandle<::core::result::Result<$ret, $crate::ClientError>> {
                let engine = ::std::sync::Arc::clone(&self.engine);
                $crate::spawn_call(async move {
                    let arguments = ::std::vec![
                        $( $crate::serde_value::to_value(&$param).expect("argument type must serialize") ),*
                    ];
                    let argument_types = ::std::vec![
                        $( ::std::any::type_name::<$param_ty>().to_owned() ),*
                    ];
                    let response = engine.call($interface, stringify!($method), arguments, argument_types).await?;
                    $crate::__rpc_service_unwrap_response!(response, $ret)
                })
            }
        }
    };

    // Sync path: awaits the reply internally and returns the unwrapped value.
    (
        $client_name:ident; $interface:expr; $method:ident; $ret:ty;
        [ $( $param:ident : $param_ty:ty ),* ];
    ) => {
        impl $client_name {
            pub async fn $method(
                &self,
                $( $param: $param_ty ),*
            ) -> ::core::result::Result<$ret, $crate::ClientError> {
                let arguments = ::std::vec![
                    $( $crate::serde_value::to_value(&$param).expect("argument type must serialize") ),*
                ];
                let argument_types = ::std::vec![
                    $( ::std::any::type_name::<$param_ty>().to_owned() ),*
                ];
                let response = self.engine.call($interface, stringify!($method), arguments, argument_types).await?;
                $crate::__rpc_service_unwrap_response!(response, $ret)
            }
        }
    };
}

/// Shared `ResponseRecord` -> `Result<T, ClientError>` unwrap, factored out
/// so the sync and handle paths don't duplicate the decode logic.
#[doc(hidden)]
#[macro_export]
macro_rules! __rpc_service_unwrap_response {
    ($response:ident, $ret:ty) => {
        if $response.success {
            let value = $response.result.ok_or_else(|| {
                $crate::ClientError::Codec($crate::jgrpc_codec::CodecError::Decode(
                    "response carried no result value".to_owned(),
                ))
            })?;
            $crate::serde_value::from_value::<$ret>(value).map_err(|err| {
                $crate::ClientError::Codec($crate::jgrpc_codec::CodecError::Decode(err.to_string()))
            })
        } else {
            ::core::result::Result::Err($crate::ClientError::Call($response.error))
        }
    };
}
