// crates/ziptools-core/src/loader/builder.rs

use super::{LocationRow, ZipRow};
use crate::code::{FixedCode, Location, Locode, Zip, LOCODE_LEN, ZIP_LEN};
use crate::config::IndexConfig;
use crate::error::{Result, ZipError};
use crate::list::CodeList;
use crate::store::{Store, WriteTxn};
use crate::text::{affixes, fold_name};

use crossbeam_channel::bounded;
use std::collections::HashSet;
use std::thread;
use tracing::{debug, info, warn};

// -----------------------------------------------------------------------------
// STATISTICS
// -----------------------------------------------------------------------------

/// Outcome of importing one feed into its primary namespace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub imported: usize,
    /// Rows filtered out on purpose (military zips, withdrawn locodes).
    pub skipped: usize,
    /// Rows that could not be used and were logged.
    pub malformed: usize,
}

/// Outcome of one derivation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeriveStats {
    /// Primary pairs consumed.
    pub pairs: usize,
    /// Lowercased names whose affixes were indexed.
    pub distinct_names: usize,
    /// Codes appended to postings lists.
    pub appended: usize,
    /// Appends dropped because the postings list was full.
    pub saturated: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub zips: ImportStats,
    pub locations: ImportStats,
    pub zip_postings: DeriveStats,
    pub location_postings: DeriveStats,
}

// -----------------------------------------------------------------------------
// BUILDER
// -----------------------------------------------------------------------------

/// Builds every namespace of a store from the source rows.
///
/// Intended for a freshly created [`Store`]; there is no incremental update.
pub struct IndexBuilder<'s> {
    store: &'s Store,
    config: IndexConfig,
}

/// Which namespaces one derivation pass reads and writes.
struct DerivePlan<'a> {
    primary: &'a str,
    exact: &'a str,
    code_affixes: Option<&'a str>,
    name_affixes: &'a str,
}

impl DerivePlan<'_> {
    fn outputs(&self) -> impl Iterator<Item = &str> {
        [Some(self.exact), self.code_affixes, Some(self.name_affixes)]
            .into_iter()
            .flatten()
    }
}

/// Extracts the indexed name from a primary value.
type NameOf = fn(&[u8]) -> Result<String>;

impl<'s> IndexBuilder<'s> {
    pub fn new(store: &'s Store, config: IndexConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Full build: both imports, then both derivation passes.
    pub fn build<Z, L>(&self, zips: Z, locations: L) -> Result<BuildStats>
    where
        Z: IntoIterator<Item = Result<ZipRow>>,
        L: IntoIterator<Item = Result<LocationRow>>,
    {
        let zips = self.import_zips(zips)?;
        let locations = self.import_locations(locations)?;
        let zip_postings = self.derive_zips()?;
        let location_postings = self.derive_locations()?;
        Ok(BuildStats {
            zips,
            locations,
            zip_postings,
            location_postings,
        })
    }

    /// Writes `zips[code] = city` for every civilian zip row.
    pub fn import_zips<I>(&self, rows: I) -> Result<ImportStats>
    where
        I: IntoIterator<Item = Result<ZipRow>>,
    {
        let ns = self.config.namespaces.zips.as_str();
        let mut stats = ImportStats::default();
        let mut tx = self.store.begin_write();
        tx.create_bucket_if_not_exists(ns);

        for (idx, row) in rows.into_iter().enumerate() {
            let row = match row.and_then(|r| validate_zip(r, idx)) {
                Ok(row) => row,
                Err(e) => {
                    warn!(error = %e, "ignored a malformed zip row");
                    stats.malformed += 1;
                    continue;
                }
            };
            if self.config.skips_zip_category(&row.category) {
                stats.skipped += 1;
                continue;
            }
            let zip = Zip::new(&row.code);
            tx.put(ns, zip.as_bytes(), row.city.into_bytes())?;
            stats.imported += 1;
        }

        tx.commit()?;
        info!(
            imported = stats.imported,
            skipped = stats.skipped,
            malformed = stats.malformed,
            "zip codes imported"
        );
        Ok(stats)
    }

    /// Writes `locations[code] = Location` for every location still in use.
    pub fn import_locations<I>(&self, rows: I) -> Result<ImportStats>
    where
        I: IntoIterator<Item = Result<LocationRow>>,
    {
        let ns = self.config.namespaces.locations.as_str();
        let mut stats = ImportStats::default();
        let mut tx = self.store.begin_write();
        tx.create_bucket_if_not_exists(ns);

        for (idx, row) in rows.into_iter().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!(error = %e, "ignored a malformed location row");
                    stats.malformed += 1;
                    continue;
                }
            };
            if self.config.skips_location_flag(&row.flag) {
                stats.skipped += 1;
                continue;
            }
            let location = match self.to_location(&row, idx) {
                Ok(location) => location,
                Err(e) => {
                    warn!(error = %e, "ignored a malformed location row");
                    stats.malformed += 1;
                    continue;
                }
            };
            tx.put(ns, location.locode.as_bytes(), location.to_bytes()?)?;
            stats.imported += 1;
        }

        tx.commit()?;
        info!(
            imported = stats.imported,
            skipped = stats.skipped,
            malformed = stats.malformed,
            "locations imported"
        );
        Ok(stats)
    }

    /// Derives `cities`, `subzips` and `subcities` from `zips`.
    pub fn derive_zips(&self) -> Result<DeriveStats> {
        let ns = &self.config.namespaces;
        let plan = DerivePlan {
            primary: &ns.zips,
            exact: &ns.cities,
            code_affixes: Some(ns.subzips.as_str()),
            name_affixes: &ns.subcities,
        };
        self.derive::<ZIP_LEN>(&plan, |value| Ok(String::from_utf8_lossy(value).into_owned()))
    }

    /// Derives `locodes` and `sublocodes` from `locations`.
    pub fn derive_locations(&self) -> Result<DeriveStats> {
        let ns = &self.config.namespaces;
        let plan = DerivePlan {
            primary: &ns.locations,
            exact: &ns.locodes,
            code_affixes: None,
            name_affixes: &ns.sublocodes,
        };
        self.derive::<LOCODE_LEN>(&plan, |value| Ok(Location::from_bytes(value)?.name))
    }

    /// One derivation pass: the calling thread streams the primary namespace
    /// into a bounded queue, a scoped thread owns the write transaction and
    /// appends postings. The transaction commits only if the writer finished
    /// without error.
    fn derive<const N: usize>(&self, plan: &DerivePlan<'_>, name_of: NameOf) -> Result<DeriveStats> {
        info!(primary = plan.primary, "deriving postings");

        let read = self.store.begin_read();
        let primary = read.require(plan.primary)?;

        let mut tx = self.store.begin_write();
        for ns in plan.outputs() {
            tx.create_bucket_if_not_exists(ns);
        }

        let (pairs_tx, pairs_rx) = bounded::<(Vec<u8>, Vec<u8>)>(self.config.queue_capacity.max(1));
        // Single slot: the writer publishes at most one error.
        let (err_tx, err_rx) = bounded::<ZipError>(1);

        let sink_tx = &mut tx;
        let stats = thread::scope(|s| {
            let writer = s.spawn(move || {
                let mut sink = PostingsWriter::<N>::new(sink_tx, plan, name_of);
                for (key, value) in pairs_rx {
                    if let Err(e) = sink.accept(&key, &value) {
                        let _ = err_tx.try_send(e);
                        return None;
                    }
                }
                Some(sink.stats)
            });

            let mut published = None;
            for (key, value) in primary.iter() {
                if let Ok(e) = err_rx.try_recv() {
                    published = Some(e);
                    break;
                }
                // Fails only once the writer has hung up.
                if pairs_tx.send((key.to_vec(), value.to_vec())).is_err() {
                    break;
                }
            }
            drop(pairs_tx);

            let finished = writer
                .join()
                .map_err(|_| ZipError::Pipeline("postings writer panicked".into()))?;
            finished.ok_or_else(|| {
                published.or_else(|| err_rx.try_recv().ok()).unwrap_or_else(|| {
                    ZipError::Pipeline("postings writer stopped without an error".into())
                })
            })
        })?;

        tx.commit()?;
        if stats.saturated > 0 {
            debug!(
                primary = plan.primary,
                saturated = stats.saturated,
                "postings lists reached capacity"
            );
        }
        info!(
            primary = plan.primary,
            pairs = stats.pairs,
            names = stats.distinct_names,
            appended = stats.appended,
            "done indexing"
        );
        Ok(stats)
    }

    fn to_location(&self, row: &LocationRow, idx: usize) -> Result<Location> {
        let code = row.code.trim();
        let name = self.config.primary_name(&row.name);
        if code.is_empty() || name.is_empty() {
            return Err(ZipError::InputRow {
                line: idx as u64 + 1,
                reason: format!("location needs a code and a name, got {:?}/{:?}", code, name),
            });
        }
        if !code.is_ascii() {
            return Err(ZipError::InputRow {
                line: idx as u64 + 1,
                reason: format!("locode {code:?} is not ASCII"),
            });
        }
        Ok(Location {
            name: name.to_string(),
            state: row.state.trim().to_string(),
            locode: Locode::new(code),
        })
    }
}

fn validate_zip(row: ZipRow, idx: usize) -> Result<ZipRow> {
    if row.code.trim().is_empty() || row.city.trim().is_empty() {
        return Err(ZipError::InputRow {
            line: idx as u64 + 1,
            reason: format!("zip row needs a code and a city, got {:?}/{:?}", row.code, row.city),
        });
    }
    // codes are cut to a fixed byte width, which must not split a char
    if !row.code.is_ascii() {
        return Err(ZipError::InputRow {
            line: idx as u64 + 1,
            reason: format!("zip code {:?} is not ASCII", row.code),
        });
    }
    Ok(ZipRow {
        code: row.code.trim().to_string(),
        category: row.category,
        city: row.city.trim().to_string(),
    })
}

// -----------------------------------------------------------------------------
// POSTINGS WRITER (consumer side of a derivation pass)
// -----------------------------------------------------------------------------

struct PostingsWriter<'t, 's, const N: usize> {
    tx: &'t mut WriteTxn<'s>,
    plan: &'t DerivePlan<'t>,
    name_of: NameOf,
    /// Lowercased names already expanded in this pass.
    seen_names: HashSet<String>,
    stats: DeriveStats,
}

impl<'t, 's, const N: usize> PostingsWriter<'t, 's, N> {
    fn new(tx: &'t mut WriteTxn<'s>, plan: &'t DerivePlan<'t>, name_of: NameOf) -> Self {
        Self {
            tx,
            plan,
            name_of,
            seen_names: HashSet::new(),
            stats: DeriveStats::default(),
        }
    }

    fn accept(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let plan = self.plan;
        let code = FixedCode::<N>::from_slice(key);
        let name = (self.name_of)(value)?;
        self.stats.pairs += 1;

        // 1. exact name -> codes
        if !name.is_empty() {
            self.append(plan.exact, name.as_bytes(), code)?;
        }

        // 2. code prefixes/suffixes -> codes
        if let Some(ns) = plan.code_affixes {
            let text = code.to_string();
            for affix in affixes(&text) {
                self.append(ns, affix.as_bytes(), code)?;
            }
        }

        // 3. name prefixes/suffixes -> codes, once per distinct name
        let folded = fold_name(&name);
        if folded.is_empty() || self.seen_names.contains(&folded) {
            return Ok(());
        }
        for affix in affixes(&folded) {
            self.append(plan.name_affixes, affix.as_bytes(), code)?;
        }
        self.stats.distinct_names += 1;
        self.seen_names.insert(folded);
        Ok(())
    }

    fn append(&mut self, ns: &str, key: &[u8], code: FixedCode<N>) -> Result<()> {
        let mut list = CodeList::<N>::from_bytes(self.tx.get(ns, key)?.unwrap_or_default())?;
        if !list.try_push(code) {
            self.stats.saturated += 1;
            return Ok(());
        }
        self.tx.put(ns, key, list.to_bytes()?)?;
        self.stats.appended += 1;
        Ok(())
    }
}
