/*!
 * SQLite persistence for the lexicon and translation history.
 *
 * One database file holds the word dictionary, the phrase table, and the
 * history of completed translations. The repository layer in
 * `crate::repositories` is the only intended consumer.
 */

pub mod connection;
pub mod schema;

pub use connection::DatabaseConnection;
