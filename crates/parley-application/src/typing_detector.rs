//! TypingDetector - debounced "you are typing in X" indicator.
//!
//! Every buffer change cancels the previously scheduled detection through its
//! `CancellationToken` and schedules a new one after the quiet period. A
//! result is committed only while holding the slot lock and only if its
//! token is still live, so at most the latest detection reaches the
//! indicator. Every buffer that is not superseded also bumps a settled
//! counter, whether or not a language was found.

use crate::language_service::LanguageService;
use parley_core::config::DetectionConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub struct TypingDetector {
    service: Arc<LanguageService>,
    debounce: Duration,
    min_input_chars: usize,
    indicator: watch::Sender<Option<String>>,
    settled: watch::Sender<u64>,
    pending: Arc<Mutex<Option<CancellationToken>>>,
}

impl TypingDetector {
    pub fn new(service: Arc<LanguageService>, config: &DetectionConfig) -> Self {
        let (indicator, _) = watch::channel(None);
        let (settled, _) = watch::channel(0);
        Self {
            service,
            debounce: config.debounce(),
            min_input_chars: config.min_input_chars,
            indicator,
            settled,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Quiet period before a buffer is detected.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Display name of the language currently shown, if any.
    pub fn current(&self) -> Option<String> {
        self.indicator.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.indicator.subscribe()
    }

    /// Counter bumped each time the latest buffer has been handled: cleared
    /// for being too short, or detected with or without a result.
    pub fn subscribe_settled(&self) -> watch::Receiver<u64> {
        self.settled.subscribe()
    }

    /// Feeds the live input buffer. Must be called from within a tokio runtime.
    pub fn on_input(&self, buffer: &str) {
        if buffer.chars().count() < self.min_input_chars {
            self.cancel();
            self.indicator.send_if_modified(|shown| shown.take().is_some());
            self.settled.send_modify(|generation| *generation += 1);
            return;
        }

        let token = CancellationToken::new();
        if let Some(previous) = lock_slot(&self.pending).replace(token.clone()) {
            previous.cancel();
        }

        let service = self.service.clone();
        let pending = self.pending.clone();
        let indicator = self.indicator.clone();
        let settled = self.settled.clone();
        let debounce = self.debounce;
        let text = buffer.to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            let name = if text.trim().is_empty() {
                None
            } else {
                let detection = tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("[TypingDetector] Detection superseded");
                        return;
                    }
                    detection = service.detect(&text, 1) => detection,
                };

                match detection {
                    Ok(Some(detection)) => detection.top_code().map(|code| service.language_name(code)),
                    Ok(None) => {
                        tracing::debug!("[TypingDetector] No confident language for input");
                        None
                    }
                    Err(e) => {
                        tracing::warn!("[TypingDetector] Language detection failed: {}", e);
                        None
                    }
                }
            };

            let slot = lock_slot(&pending);
            if token.is_cancelled() {
                return;
            }
            if let Some(name) = name {
                indicator.send_replace(Some(name));
            }
            settled.send_modify(|generation| *generation += 1);
            drop(slot);
        });
    }

    /// Cancels any pending or in-flight detection.
    pub fn cancel(&self) {
        if let Some(token) = lock_slot(&self.pending).take() {
            token.cancel();
        }
    }

    /// Cancels pending work and clears the indicator.
    pub fn clear(&self) {
        self.on_input("");
    }
}

impl Drop for TypingDetector {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock_slot(
    slot: &Mutex<Option<CancellationToken>>,
) -> MutexGuard<'_, Option<CancellationToken>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
