mod client;
mod draft;

pub use client::{Address, Client, ClientPayload, Phone};
pub use draft::{AddressDraft, AddressField, ClientDraft, FormField, PhoneDraft, PhonePart};
