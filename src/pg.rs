//! Postgres-backed collaborators, built on Diesel.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE public_id_secret (
//!     namespace TEXT PRIMARY KEY,
//!     secret BYTEA NOT NULL
//! );
//! CREATE SEQUENCE public_id_seq START 1;
//! ```

use std::sync::Mutex;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bytea, Text};
use rand::RngCore;

use crate::store::SECRET_LENGTH;
use crate::{Counter, Error, SecretProvider};

const INSERT_SECRET: &str =
    "INSERT INTO public_id_secret (namespace, secret) VALUES ($1, $2) ON CONFLICT (namespace) DO NOTHING";
const SELECT_SECRET: &str = "SELECT secret FROM public_id_secret WHERE namespace = $1";
const NEXT_VALUE: &str = "SELECT nextval($1::regclass) AS value";

#[derive(QueryableByName)]
struct SecretRow {
    #[diesel(sql_type = Bytea)]
    secret: Vec<u8>,
}

#[derive(QueryableByName)]
struct CounterRow {
    #[diesel(sql_type = BigInt)]
    value: i64,
}

/// Stores one secret per namespace in the `public_id_secret` table.
///
/// An existing secret is simply read.  Otherwise a fresh candidate is offered
/// with an insert that ignores conflicts and the stored row is read back, so
/// concurrent first callers all end up with whichever secret was committed first.
pub struct PgSecretProvider {
    conn: Mutex<PgConnection>,
}

impl PgSecretProvider {
    pub fn new(conn: PgConnection) -> Self {
        PgSecretProvider {
            conn: Mutex::new(conn),
        }
    }

    pub fn establish(database_url: &str) -> Result<Self, Error> {
        let conn = PgConnection::establish(database_url)
            .map_err(|e| Error::SecretUnavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

impl SecretProvider for PgSecretProvider {
    fn get_or_create_secret(&self, namespace: &str) -> Result<Vec<u8>, Error> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| Error::SecretUnavailable(e.to_string()))?;

        if let Some(secret) = select_secret(&mut conn, namespace)? {
            return Ok(secret);
        }

        let mut candidate = vec![0u8; SECRET_LENGTH];
        rand::thread_rng().fill_bytes(&mut candidate);
        diesel::sql_query(INSERT_SECRET)
            .bind::<Text, _>(namespace)
            .bind::<Bytea, _>(candidate.as_slice())
            .execute(&mut *conn)
            .map_err(|e| Error::SecretUnavailable(e.to_string()))?;

        // Another caller may have won the insert; the stored row is authoritative.
        select_secret(&mut conn, namespace)?
            .ok_or_else(|| Error::SecretUnavailable(format!("no secret stored for {}", namespace)))
    }
}

fn select_secret(conn: &mut PgConnection, namespace: &str) -> Result<Option<Vec<u8>>, Error> {
    let row: Option<SecretRow> = diesel::sql_query(SELECT_SECRET)
        .bind::<Text, _>(namespace)
        .get_result(conn)
        .optional()
        .map_err(|e| Error::SecretUnavailable(e.to_string()))?;
    Ok(row.map(|row| row.secret))
}

/// Draws counter values from a Postgres sequence.
pub struct PgCounter {
    conn: Mutex<PgConnection>,
    sequence: String,
}

impl PgCounter {
    pub fn new(conn: PgConnection, sequence: &str) -> Self {
        PgCounter {
            conn: Mutex::new(conn),
            sequence: sequence.to_string(),
        }
    }

    pub fn establish(database_url: &str, sequence: &str) -> Result<Self, Error> {
        let conn = PgConnection::establish(database_url)
            .map_err(|e| Error::CounterUnavailable(e.to_string()))?;
        Ok(Self::new(conn, sequence))
    }
}

impl Counter for PgCounter {
    fn next(&self) -> Result<u64, Error> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| Error::CounterUnavailable(e.to_string()))?;
        let row: CounterRow = diesel::sql_query(NEXT_VALUE)
            .bind::<Text, _>(self.sequence.as_str())
            .get_result(&mut *conn)
            .map_err(|e| Error::CounterUnavailable(e.to_string()))?;
        u64::try_from(row.value)
            .map_err(|_| Error::CounterUnavailable(format!("sequence returned {}", row.value)))
    }
}
