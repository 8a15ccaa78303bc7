// Chatty levels compile away unless testing or built with the `debug` feature.

macro_rules! trace {
    ($($tts:tt)*) => {
        #[cfg(any(test, feature="debug"))]
        tracing::trace!($($tts)*)
    }
}

macro_rules! debug {
    ($($tts:tt)*) => {
        #[cfg(any(test, feature="debug"))]
        tracing::debug!($($tts)*)
    }
}

macro_rules! info {
    ($($tts:tt)*) => {
        tracing::info!($($tts)*)
    }
}

macro_rules! warn {
    ($($tts:tt)*) => {
        tracing::warn!($($tts)*)
    }
}
