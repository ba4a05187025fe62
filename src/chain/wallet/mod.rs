mod keys;

pub use keys::{
    AccountAddress, AuthenticationKey, KeyError, LocalAccount, ADDRESS_LENGTH, AUTH_KEY_LENGTH,
    PRIVATE_KEY_LENGTH,
};
