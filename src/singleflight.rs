//! Request coalescing: collapses concurrent identical misses into one call.
//!
//! While a call for key `K` is in flight, every other caller asking for `K`
//! blocks on the same call instead of starting a second one. Once the call
//! completes, its result (cloned) is handed to every waiter and the entry is
//! removed, so the next call for `K` starts fresh.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use crate::error::Error;

struct Call {
    state: Mutex<CallState>,
    done: Condvar,
}

struct CallState {
    result: Option<Result<crate::byteview::ByteView, Error>>,
}

/// A single-flight coalescing group, keyed by `String`.
///
/// The internal map is constructed eagerly with the struct itself, so there
/// is no first-use initialization race to guard against.
#[derive(Default)]
pub struct SingleFlight {
    calls: Mutex<HashMap<String, Arc<Call>>>,
}

impl std::fmt::Debug for SingleFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight").finish()
    }
}

impl SingleFlight {
    /// Builds an empty coalescing group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `thunk` for `key`, or, if a call for `key` is already in flight,
    /// waits for and returns its result instead of running `thunk` again.
    pub fn do_call<F>(
        &self,
        key: &str,
        thunk: F,
    ) -> Result<crate::byteview::ByteView, Error>
    where
        F: FnOnce() -> Result<crate::byteview::ByteView, Error>,
    {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            if let Some(existing) = calls.get(key) {
                existing.clone()
            } else {
                let call = Arc::new(Call {
                    state: Mutex::new(CallState { result: None }),
                    done: Condvar::new(),
                });
                calls.insert(key.to_string(), call.clone());
                drop(calls);
                self.run_and_publish(key, &call, thunk);
                return Self::wait_for_result(&call);
            }
        };
        Self::wait_for_result(&call)
    }

    /// Runs `thunk`, stores its result (including the "panicked" case) on
    /// `call`, wakes every waiter, and removes `key` from the in-flight map.
    fn run_and_publish<F>(&self, key: &str, call: &Arc<Call>, thunk: F)
    where
        F: FnOnce() -> Result<crate::byteview::ByteView, Error>,
    {
        struct PublishOnDrop<'a> {
            singleflight: &'a SingleFlight,
            key: &'a str,
            call: &'a Arc<Call>,
            result: Option<Result<crate::byteview::ByteView, Error>>,
        }

        impl Drop for PublishOnDrop<'_> {
            fn drop(&mut self) {
                let result = self.result.take().unwrap_or_else(|| {
                    Err(Error::LoaderFailure(
                        "loader panicked while computing value".to_string(),
                    ))
                });
                {
                    let mut state = self.call.state.lock().unwrap();
                    state.result = Some(result);
                }
                self.call.done.notify_all();
                self.singleflight.calls.lock().unwrap().remove(self.key);
            }
        }

        let mut guard = PublishOnDrop {
            singleflight: self,
            key,
            call,
            result: None,
        };
        guard.result = Some(thunk());
    }

    fn wait_for_result(call: &Arc<Call>) -> Result<crate::byteview::ByteView, Error> {
        let mut state = call.state.lock().unwrap();
        while state.result.is_none() {
            state = call.done.wait(state).unwrap();
        }
        state.result.clone().expect("result set before notify")
    }
}
