//! Secret sealing for values the host persists (client secrets, access tokens).

mod encryption;
mod sealer;

pub use sealer::{AesGcmSealer, PlaintextSealer, SealedSecret, SecretSealer, AES_256_GCM};
