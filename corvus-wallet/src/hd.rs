//! BIP32-Ed25519 "V2" extended key derivation.
//!
//! The child-key formulas here are written out explicitly rather than
//! delegated to `ed25519_bip32`'s private-key derivation, because the V2
//! scheme's carry propagation through `add28Mul8` is the one piece of this
//! crate that must be bit-for-bit auditable: Cardano mainnet wallets depend
//! on this exact (and not fully "correct") asymmetric-carry behavior, and a
//! future maintainer correcting it would silently break every derived
//! address. Public-key-only soft derivation (no private scalar available)
//! still goes through `ed25519_bip32`, since it needs Ed25519 point
//! addition that isn't exposed by the symmetric-key primitives this crate
//! otherwise depends on.

use bech32::{FromBase32, ToBase32};
use bip39::rand_core::{CryptoRng, RngCore};
use bip39::{Language, Mnemonic};
use corvus_crypto::key::ed25519::{self, SecretKeyExtended};
use cryptoxide::{hmac::Hmac, mac::Mac, pbkdf2::pbkdf2, sha2::Sha512};

use crate::{Error, PrivateKey};

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// `m / 1852' / 1815' / account' / role / index`, role 0 = external payment keys.
pub const PAYMENT_ROLE: u32 = 0;
/// `m / 1852' / 1815' / account' / role / index`, role 2 = staking keys.
pub const STAKING_ROLE: u32 = 2;

fn pbkdf2_hmac_sha512(password: &[u8], entropy: &[u8], iterations: u32, out: &mut [u8]) {
    let mut mac = Hmac::new(Sha512::new(), password);
    pbkdf2(&mut mac, entropy, iterations, out);
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = Hmac::new(Sha512::new(), key);
    mac.input(data);
    let mut out = [0u8; 64];
    mac.raw_result(&mut out);
    out
}

/// `r = x + 8*y`, as a 256-bit little-endian integer. The low 28 bytes carry
/// the multiply-and-add; the top 4 bytes only ever propagate carry, they are
/// never multiplied and the result is never re-clamped. This asymmetry is
/// deliberate — see the module docs.
fn add28_mul8(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;

    for i in 0..28 {
        let r = x[i] as u16 + (y[i] as u16) * 8 + carry;
        out[i] = r as u8;
        carry = r >> 8;
    }
    for i in 28..32 {
        let r = x[i] as u16 + carry;
        out[i] = r as u8;
        carry = r >> 8;
    }

    out
}

/// `r = (x + y) mod 2^256`, little-endian, carry past the top byte discarded.
fn add_256(x: &[u8; 32], y: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;

    for i in 0..32 {
        let r = x[i] as u16 + y[i] as u16 + carry;
        out[i] = r as u8;
        carry = r >> 8;
    }

    out
}

fn clamp_scalar(scalar: &mut [u8; 32]) {
    scalar[0] &= 0b1111_1000;
    scalar[31] &= 0b0011_1111;
    scalar[31] |= 0b0100_0000;
}

/// The 96-byte extended private key: `scalar(32) || iv(32) || chainCode(32)`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bip32PrivateKey {
    scalar: [u8; 32],
    iv: [u8; 32],
    chain_code: [u8; 32],
}

impl Bip32PrivateKey {
    const BECH32_HRP: &'static str = "xprv";

    /// PBKDF2-HMAC-SHA512 iteration count used to stretch BIP39 entropy into
    /// the 96-byte root key. BIP39 itself specifies 2048 for its own
    /// mnemonic-to-seed transform; Cardano's variant, operating directly on
    /// entropy rather than the full seed phrase, uses 4096.
    const ROOT_KEY_ITERATIONS: u32 = 4096;

    pub fn generate<T: RngCore + CryptoRng>(mut rng: T) -> Self {
        let mut buf = [0u8; 96];
        rng.fill_bytes(&mut buf);
        Self::from_root_material(buf)
    }

    pub fn generate_with_mnemonic<T: RngCore + CryptoRng>(
        mut rng: T,
        password: String,
    ) -> (Self, Mnemonic) {
        let mnemonic = Mnemonic::generate_in_with(&mut rng, Language::English, 24).unwrap();
        let key = Self::from_bip39_mnenomic(mnemonic.to_string(), password)
            .expect("freshly generated mnemonic is always valid");
        (key, mnemonic)
    }

    pub fn from_bip39_mnenomic(mnemonic: String, password: String) -> Result<Self, Error> {
        let mnemonic = Mnemonic::parse(mnemonic).map_err(Error::InvalidMnemonic)?;
        let entropy = mnemonic.to_entropy();

        let mut out = [0u8; 96];
        pbkdf2_hmac_sha512(password.as_bytes(), &entropy, Self::ROOT_KEY_ITERATIONS, &mut out);

        Ok(Self::from_root_material(out))
    }

    /// Lays out 96 bytes of key material as `scalar || iv || chainCode`,
    /// clamping the scalar. This is the final step of both mnemonic-derived
    /// and randomly-generated root keys.
    fn from_root_material(mut material: [u8; 96]) -> Self {
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(&material[0..32]);
        clamp_scalar(&mut scalar);
        material[0..32].copy_from_slice(&scalar);

        let mut iv = [0u8; 32];
        iv.copy_from_slice(&material[32..64]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&material[64..96]);

        Self { scalar, iv, chain_code }
    }

    pub fn from_bytes(bytes: [u8; 96]) -> Result<Self, Error> {
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(&bytes[0..32]);
        let mut iv = [0u8; 32];
        iv.copy_from_slice(&bytes[32..64]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[64..96]);
        Ok(Self { scalar, iv, chain_code })
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(96);
        out.extend_from_slice(&self.scalar);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.chain_code);
        out
    }

    fn extended_secret(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&self.scalar);
        out[32..64].copy_from_slice(&self.iv);
        out
    }

    /// `A = [scalar] * B`, the Ed25519 basepoint multiplication used both as
    /// the public key and as the derivation input for soft children.
    fn public_point(&self) -> [u8; 32] {
        ed25519::extended_to_public(&self.extended_secret())
    }

    /// Derive the child at `index`. Indices `>= 2^31` are hardened.
    pub fn derive(&self, index: u32) -> Self {
        let hardened = index >= HARDENED_OFFSET;
        let index_le = index.to_le_bytes();

        let (z_tag, cc_tag, data): (u8, u8, Vec<u8>) = if hardened {
            let mut data = Vec::with_capacity(64 + 4);
            data.extend_from_slice(&self.scalar);
            data.extend_from_slice(&self.iv);
            data.extend_from_slice(&index_le);
            (0x00, 0x01, data)
        } else {
            let mut data = Vec::with_capacity(32 + 4);
            data.extend_from_slice(&self.public_point());
            data.extend_from_slice(&index_le);
            (0x02, 0x03, data)
        };

        let mut z_input = Vec::with_capacity(1 + data.len());
        z_input.push(z_tag);
        z_input.extend_from_slice(&data);
        let z = hmac_sha512(&self.chain_code, &z_input);

        let mut zl = [0u8; 32];
        zl.copy_from_slice(&z[0..32]);
        let mut zr = [0u8; 32];
        zr.copy_from_slice(&z[32..64]);

        let scalar = add28_mul8(&self.scalar, &zl);
        let iv = add_256(&self.iv, &zr);

        let mut cc_input = Vec::with_capacity(1 + data.len());
        cc_input.push(cc_tag);
        cc_input.extend_from_slice(&data);
        let cc_digest = hmac_sha512(&self.chain_code, &cc_input);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&cc_digest[32..64]);

        Self { scalar, iv, chain_code }
    }

    /// Derives along a parsed path, applying each index in order.
    pub fn derive_path(&self, path: &DerivationPath) -> Self {
        path.0.iter().fold(self.clone(), |key, &i| key.derive(i))
    }

    pub fn to_ed25519_private_key(&self) -> PrivateKey {
        PrivateKey::Extended(unsafe {
            // Built from a freshly clamped/derived scalar, so this always
            // satisfies SecretKeyExtended's structural invariants.
            SecretKeyExtended::from_bytes_unchecked(self.extended_secret())
        })
    }

    pub fn to_public(&self) -> Bip32PublicKey {
        Bip32PublicKey {
            public_key: self.public_point(),
            chain_code: self.chain_code,
        }
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn to_bech32(&self) -> String {
        bech32::encode(Self::BECH32_HRP, self.as_bytes().to_base32(), bech32::Variant::Bech32)
            .unwrap()
    }

    pub fn from_bech32(bech32: String) -> Result<Self, Error> {
        let (hrp, data, _) = bech32::decode(&bech32).map_err(Error::InvalidBech32)?;
        if hrp != Self::BECH32_HRP {
            Err(Error::InvalidBech32Hrp)
        } else {
            let data = Vec::<u8>::from_base32(&data).map_err(Error::InvalidBech32)?;
            Self::from_bytes(data.try_into().map_err(|_| Error::UnexpectedBech32Length)?)
        }
    }
}

/// Ed25519-BIP32 HD public key: `pub(32) || chainCode(32)`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bip32PublicKey {
    public_key: [u8; 32],
    chain_code: [u8; 32],
}

impl Bip32PublicKey {
    const BECH32_HRP: &'static str = "xpub";

    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&bytes[0..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[32..64]);
        Self { public_key, chain_code }
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(&self.public_key);
        out.extend_from_slice(&self.chain_code);
        out
    }

    /// Soft (non-hardened) public derivation. Hardened indices have no
    /// public-key-only derivation path — the caller must hold the private
    /// key. Point addition is delegated to `ed25519_bip32`.
    pub fn derive(&self, index: u32) -> Result<Self, Error> {
        if index >= HARDENED_OFFSET {
            return Err(Error::HardenedDerivationOnPublicKey);
        }

        let xpub = ed25519_bip32::XPub::from_bytes(self.as_bytes().try_into().unwrap());
        let child = xpub
            .derive(ed25519_bip32::DerivationScheme::V2, index)
            .map_err(Error::DerivationError)?;

        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(child.public_key());
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(child.chain_code());

        Ok(Self { public_key, chain_code })
    }

    pub fn to_ed25519_pubkey(&self) -> ed25519::PublicKey {
        ed25519::PublicKey::from(self.public_key)
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn to_bech32(&self) -> String {
        bech32::encode(Self::BECH32_HRP, self.as_bytes().to_base32(), bech32::Variant::Bech32)
            .unwrap()
    }

    pub fn from_bech32(bech32: String) -> Result<Self, Error> {
        let (hrp, data, _) = bech32::decode(&bech32).map_err(Error::InvalidBech32)?;
        if hrp != Self::BECH32_HRP {
            Err(Error::InvalidBech32Hrp)
        } else {
            let data = Vec::<u8>::from_base32(&data).map_err(Error::InvalidBech32)?;
            Ok(Self::from_bytes(
                data.try_into().map_err(|_| Error::UnexpectedBech32Length)?,
            ))
        }
    }
}

/// A parsed derivation path, e.g. `m/1852'/1815'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// The standard Cardano payment path for `account` and `index`.
    pub fn payment(account: u32, index: u32) -> Self {
        Self(vec![
            1852 + HARDENED_OFFSET,
            1815 + HARDENED_OFFSET,
            account + HARDENED_OFFSET,
            PAYMENT_ROLE,
            index,
        ])
    }

    /// The standard Cardano staking path for `account` and `index`.
    pub fn staking(account: u32, index: u32) -> Self {
        Self(vec![
            1852 + HARDENED_OFFSET,
            1815 + HARDENED_OFFSET,
            account + HARDENED_OFFSET,
            STAKING_ROLE,
            index,
        ])
    }

    pub fn parse(path: &str) -> Result<Self, Error> {
        let path = path.strip_prefix("m/").unwrap_or(path);
        if path.is_empty() {
            return Ok(Self(Vec::new()));
        }

        let mut indices = Vec::new();
        for segment in path.split('/') {
            let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
                Some(digits) => (digits, true),
                None => (segment, false),
            };

            let value: u32 = digits
                .parse()
                .map_err(|_| Error::InvalidPath(path.to_owned()))?;

            if value >= HARDENED_OFFSET {
                return Err(Error::InvalidPath(path.to_owned()));
            }

            indices.push(if hardened { value + HARDENED_OFFSET } else { value });
        }

        Ok(Self(indices))
    }
}
