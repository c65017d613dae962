//! JWKS Cache
//!
//! Holds the identity provider's signing keys, indexed by key id. A token
//! signed with an unknown key id triggers exactly one re-fetch of the key
//! set; if the key is still unknown afterwards the token is rejected.
//! Concurrent misses are collapsed into a single fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey};
use pws_domain::error::{Error, Result};
use pws_domain::ports::IdentityProvider;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Key family, used to reject tokens whose `alg` does not fit the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    /// RSA (RS*/PS*)
    Rsa,
    /// Elliptic curve (ES*)
    Ec,
    /// Shared secret (HS*)
    Symmetric,
    /// Edwards curve (EdDSA)
    Okp,
}

impl KeyFamily {
    /// Family of a JWK
    pub fn of_jwk(jwk: &Jwk) -> Self {
        match &jwk.algorithm {
            AlgorithmParameters::RSA(_) => Self::Rsa,
            AlgorithmParameters::EllipticCurve(_) => Self::Ec,
            AlgorithmParameters::OctetKey(_) => Self::Symmetric,
            AlgorithmParameters::OctetKeyPair(_) => Self::Okp,
        }
    }

    /// Family a signing algorithm requires
    #[allow(unreachable_patterns)]
    pub fn of_algorithm(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Some(Self::Symmetric),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => Some(Self::Rsa),
            Algorithm::ES256 | Algorithm::ES384 => Some(Self::Ec),
            Algorithm::EdDSA => Some(Self::Okp),
            _ => None,
        }
    }
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    family: KeyFamily,
}

/// Cached signing keys of the identity provider
pub struct JwksCache {
    provider: Arc<dyn IdentityProvider>,
    keys: RwLock<HashMap<String, CachedKey>>,
    refetch: Mutex<()>,
    fetches: AtomicU64,
}

impl JwksCache {
    /// Create an empty cache; keys are fetched on first use
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            keys: RwLock::new(HashMap::new()),
            refetch: Mutex::new(()),
            fetches: AtomicU64::new(0),
        }
    }

    /// Number of key set fetches performed so far
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Number of cached keys
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    /// Whether no key is cached
    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }

    /// Resolve the decoding key for a token header
    ///
    /// # Arguments
    /// * `kid` - Key id from the token header
    /// * `alg` - Algorithm from the token header
    ///
    /// # Returns
    /// The key, or `InvalidToken` if it is unknown after one re-fetch or
    /// belongs to a different key family than `alg`
    pub async fn decoding_key(&self, kid: Option<&str>, alg: Algorithm) -> Result<DecodingKey> {
        let family = KeyFamily::of_algorithm(alg)
            .ok_or_else(|| Error::invalid_token(format!("unsupported algorithm {alg:?}")))?;

        if let Some(found) = self.lookup(kid).await {
            return Self::check_family(found, family);
        }

        let seen = self.fetch_count();
        let _guard = self.refetch.lock().await;
        // Another task may have refreshed the set while we waited.
        if self.fetch_count() == seen {
            debug!(kid = ?kid, "Signing key not cached, fetching key set");
            self.refresh().await?;
        }

        match self.lookup(kid).await {
            Some(found) => Self::check_family(found, family),
            None => Err(Error::invalid_token(format!(
                "unknown signing key {}",
                kid.unwrap_or("<none>")
            ))),
        }
    }

    /// Replace the cached keys with a fresh copy of the provider's key set
    ///
    /// # Returns
    /// The number of usable keys
    pub async fn refresh(&self) -> Result<usize> {
        let set = self.provider.fetch_jwks().await?;
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let keys = Self::index(&set);
        let count = keys.len();
        *self.keys.write().await = keys;
        info!(keys = count, provider = self.provider.provider_name(), "Loaded signing keys");
        Ok(count)
    }

    async fn lookup(&self, kid: Option<&str>) -> Option<CachedKey> {
        let keys = self.keys.read().await;
        match kid {
            Some(kid) => keys.get(kid).cloned(),
            None if keys.len() == 1 => keys.values().next().cloned(),
            None => None,
        }
    }

    fn check_family(found: CachedKey, expected: KeyFamily) -> Result<DecodingKey> {
        if found.family == expected {
            Ok(found.key)
        } else {
            Err(Error::invalid_token(
                "token algorithm does not match signing key type",
            ))
        }
    }

    fn index(set: &JwkSet) -> HashMap<String, CachedKey> {
        let mut keys = HashMap::new();
        for jwk in &set.keys {
            let kid = jwk.common.key_id.clone().unwrap_or_default();
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(
                        kid,
                        CachedKey {
                            key,
                            family: KeyFamily::of_jwk(jwk),
                        },
                    );
                }
                Err(e) => warn!(kid = %kid, error = %e, "Skipping unusable signing key"),
            }
        }
        keys
    }
}

impl std::fmt::Debug for JwksCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksCache")
            .field("provider", &self.provider.provider_name())
            .field("fetches", &self.fetch_count())
            .finish_non_exhaustive()
    }
}
