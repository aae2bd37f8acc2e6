//! Supabase adapter - PostgREST implementation of the subscription store.

mod supabase_repository;

pub use supabase_repository::{SupabaseConfig, SupabaseSubscriptionRepository};
