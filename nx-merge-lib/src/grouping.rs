//! Grouping engine: raw files in, one group per title out.
//!
//! Grouping runs in four passes over an in-memory snapshot:
//!
//! 1. **Buckets**: every file lands in a bucket keyed by its title ID, or by
//!    `dir:<parent>` when it has no ID. Files with neither are dropped.
//! 2. **Directories**: a directory holding buckets for two or more keys
//!    becomes one `dir:<name>` group and absorbs those buckets.
//! 3. **Families**: remaining ID buckets are merged by base ID (first 13
//!    digits + `000`).
//! 4. **Names**: groups whose display names normalize to the same key are
//!    merged, via a name index built once.
//!
//! Finally each group keeps only its latest update.
//!
//! The input is ordered by path before the first pass, so "first
//! encountered" always means "first by path" and the output does not depend
//! on the order files were handed in.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use nx_merge_core::{Kind, RawFile, TitleId, normalize_name, select_latest_update};
use serde::Serialize;

use crate::progress::ScanEvent;

/// Identity of a group in the final mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    /// A title family, keyed by its base ID.
    Title(TitleId),
    /// A directory-derived group (`dir:<path>`), keyed by the directory's
    /// root-relative path with `/` separators.
    Directory(String),
}

impl GroupKey {
    pub fn is_directory(&self) -> bool {
        matches!(self, GroupKey::Directory(_))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Title(id) => write!(f, "{id}"),
            GroupKey::Directory(dir) => write!(f, "dir:{dir}"),
        }
    }
}

/// All files that make up one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleGroup {
    key: GroupKey,
    display_name: String,
    base: Option<RawFile>,
    updates: Vec<RawFile>,
    dlcs: Vec<RawFile>,
}

impl TitleGroup {
    fn new(key: GroupKey, display_name: String) -> Self {
        Self {
            key,
            display_name,
            base: None,
            updates: Vec::new(),
            dlcs: Vec::new(),
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// The group's ID as it appears in the output mapping.
    pub fn id(&self) -> String {
        self.key.to_string()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn base(&self) -> Option<&RawFile> {
        self.base.as_ref()
    }

    pub fn has_base(&self) -> bool {
        self.base.is_some()
    }

    /// The update kept for this title, if any.
    pub fn selected_update(&self) -> Option<&RawFile> {
        self.updates.first()
    }

    /// Updates held by the group. At most one once grouping has finished.
    pub fn updates(&self) -> &[RawFile] {
        &self.updates
    }

    /// DLC files, ordered by path, no duplicates.
    pub fn dlcs(&self) -> &[RawFile] {
        &self.dlcs
    }

    /// Take `other`'s base if it is bigger, and pool its updates and DLC.
    ///
    /// Equal-sized bases are decided by path so that merging is independent
    /// of the order groups are absorbed in.
    fn absorb(&mut self, other: TitleGroup) {
        if let Some(candidate) = other.base {
            let replace = match &self.base {
                None => true,
                Some(current) => {
                    candidate.size() > current.size()
                        || (candidate.size() == current.size()
                            && candidate.path() < current.path())
                }
            };
            if replace {
                self.base = Some(candidate);
            }
        }
        if !self.key.is_directory() && other.key.is_directory() {
            self.key = other.key;
        }
        self.updates.extend(other.updates);
        self.dlcs.extend(other.dlcs);
    }

    fn dedup_files(&mut self) {
        for files in [&mut self.updates, &mut self.dlcs] {
            files.sort_by(|a, b| a.path().cmp(b.path()));
            files.dedup_by(|a, b| a.path() == b.path());
        }
    }
}

/// Serializable view of a group handed to the merge executor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutput {
    pub display_name: String,
    pub base_file: Option<PathBuf>,
    pub selected_update_file: Option<PathBuf>,
    pub dlc_files: Vec<PathBuf>,
}

impl From<&TitleGroup> for GroupOutput {
    fn from(group: &TitleGroup) -> Self {
        Self {
            display_name: group.display_name.clone(),
            base_file: group.base().map(|f| f.path().to_path_buf()),
            selected_update_file: group.selected_update().map(|f| f.path().to_path_buf()),
            dlc_files: group.dlcs.iter().map(|f| f.path().to_path_buf()).collect(),
        }
    }
}

/// Final result of grouping: group ID to group, ordered by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: BTreeMap<String, TitleGroup>,
}

impl Grouping {
    pub fn get(&self, id: &str) -> Option<&TitleGroup> {
        self.groups.get(id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in ID order.
    pub fn groups(&self) -> impl Iterator<Item = &TitleGroup> {
        self.groups.values()
    }

    /// Groups that have a base file, i.e. the default batch for merging.
    pub fn mergeable(&self) -> impl Iterator<Item = &TitleGroup> {
        self.groups.values().filter(|g| g.has_base())
    }

    /// Groups that were found but have no base file.
    pub fn without_base(&self) -> impl Iterator<Item = &TitleGroup> {
        self.groups.values().filter(|g| !g.has_base())
    }

    pub fn to_output(&self) -> BTreeMap<String, GroupOutput> {
        self.groups
            .iter()
            .map(|(id, group)| (id.clone(), GroupOutput::from(group)))
            .collect()
    }
}

// -- Pass 1: buckets --

/// Group-key form of a root-relative directory: components joined by `/`.
fn dir_key(dir: &Path) -> String {
    dir.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BucketKey {
    Title(TitleId),
    Directory(String),
}

#[derive(Debug)]
struct Bucket {
    key: BucketKey,
    /// Root-relative grouping directory of the first file placed in the bucket
    dir: Option<PathBuf>,
    name: String,
    base: Option<RawFile>,
    updates: Vec<RawFile>,
    dlcs: Vec<RawFile>,
}

impl Bucket {
    fn add(&mut self, file: &RawFile) {
        match file.kind() {
            Kind::Dlc => self.dlcs.push(file.clone()),
            Kind::Update => self.updates.push(file.clone()),
            Kind::Base => {
                if self.base.as_ref().is_none_or(|b| file.size() > b.size()) {
                    self.base = Some(file.clone());
                }
            }
        }
    }

    fn title_id(&self) -> Option<&TitleId> {
        match &self.key {
            BucketKey::Title(id) => Some(id),
            BucketKey::Directory(_) => None,
        }
    }
}

fn bucket_files(files: &[&RawFile], progress: &dyn Fn(ScanEvent)) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<BucketKey, usize> = HashMap::new();

    for file in files {
        let (key, name) = match (file.title_id(), file.parent_path()) {
            (Some(id), _) => (BucketKey::Title(id.clone()), file.candidate_name().to_string()),
            (None, Some(dir)) => (BucketKey::Directory(dir_key(dir)), dir_name(dir)),
            (None, None) => {
                log::debug!("Dropping {}: no title ID and no directory", file.path().display());
                progress(ScanEvent::FileDropped {
                    path: file.path().to_path_buf(),
                });
                continue;
            }
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push(Bucket {
                key,
                dir: file.parent_path().map(Path::to_path_buf),
                name,
                base: None,
                updates: Vec::new(),
                dlcs: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].add(file);
    }

    buckets
}

// -- Passes 2 and 3: directories and families --

fn aggregate(buckets: Vec<Bucket>, progress: &dyn Fn(ScanEvent)) -> Vec<TitleGroup> {
    // Directories shared by two or more buckets; dot-directories never qualify.
    let mut by_dir: HashMap<&Path, usize> = HashMap::new();
    for bucket in &buckets {
        if let Some(dir) = bucket.dir.as_deref().filter(|d| !dir_name(d).starts_with('.')) {
            *by_dir.entry(dir).or_default() += 1;
        }
    }
    let shared_dir = |bucket: &Bucket| -> Option<String> {
        bucket
            .dir
            .as_deref()
            .filter(|d| by_dir.get(d).is_some_and(|&n| n >= 2))
            .map(dir_key)
    };

    let mut members: Vec<(GroupKey, Vec<Bucket>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let keys: Vec<GroupKey> = buckets
        .iter()
        .map(|bucket| match (shared_dir(bucket), &bucket.key) {
            (Some(dir), _) => GroupKey::Directory(dir),
            (None, BucketKey::Title(id)) => GroupKey::Title(id.base_id()),
            (None, BucketKey::Directory(dir)) => GroupKey::Directory(dir.clone()),
        })
        .collect();
    for (key, bucket) in keys.into_iter().zip(buckets) {
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            members.push((key, Vec::new()));
            members.len() - 1
        });
        members[slot].1.push(bucket);
    }

    members
        .into_iter()
        .map(|(key, group)| match key {
            GroupKey::Directory(dir) if group.len() > 1 => {
                log::debug!("Directory '{}' spans {} title keys, grouping by directory", dir, group.len());
                progress(ScanEvent::DirectoryGroupFormed {
                    dir: dir.clone(),
                    members: group.len(),
                });
                directory_group(dir, group)
            }
            key => family_group(key, group),
        })
        .collect()
}

/// Merge every bucket in a shared directory. The largest base wins.
fn directory_group(dir: String, buckets: Vec<Bucket>) -> TitleGroup {
    let name = dir.rsplit('/').next().unwrap_or(&dir).to_string();
    let mut group = TitleGroup::new(GroupKey::Directory(dir), name);
    for bucket in buckets {
        if let Some(base) = bucket.base {
            if group.base.as_ref().is_none_or(|b| base.size() > b.size()) {
                group.base = Some(base);
            }
        }
        group.updates.extend(bucket.updates);
        group.dlcs.extend(bucket.dlcs);
    }
    group
}

/// Merge the buckets of one title family (or a lone directory bucket).
///
/// The base and display name come from the bucket whose ID ends in `000`
/// if it has a base file, else from the first bucket with a base file, else
/// from the first bucket.
fn family_group(key: GroupKey, mut buckets: Vec<Bucket>) -> TitleGroup {
    let main = buckets
        .iter()
        .position(|b| b.base.is_some() && b.title_id().is_some_and(TitleId::is_base))
        .or_else(|| buckets.iter().position(|b| b.base.is_some()))
        .unwrap_or(0);

    let name = std::mem::take(&mut buckets[main].name);
    let mut group = TitleGroup::new(key, name);
    group.base = buckets[main].base.take();
    for bucket in buckets {
        group.updates.extend(bucket.updates);
        group.dlcs.extend(bucket.dlcs);
    }
    group
}

// -- Pass 4: names --

/// Same-title key for a display name. Names made only of punctuation or
/// non-Latin script normalize to "", so those fall back to the lower-cased
/// name itself.
fn name_key(display_name: &str) -> String {
    let norm = normalize_name(display_name);
    if norm.is_empty() {
        display_name.to_lowercase()
    } else {
        norm
    }
}

fn merge_same_names(groups: Vec<TitleGroup>, progress: &dyn Fn(ScanEvent)) -> Vec<TitleGroup> {
    let mut merged: Vec<TitleGroup> = Vec::with_capacity(groups.len());
    let mut sources: Vec<Vec<String>> = Vec::with_capacity(groups.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for group in groups {
        let key = name_key(&group.display_name);
        match by_name.get(&key).copied() {
            Some(slot) => {
                sources[slot].push(group.id());
                merged[slot].absorb(group);
            }
            None => {
                by_name.insert(key, merged.len());
                sources.push(vec![group.id()]);
                merged.push(group);
            }
        }
    }

    for (group, ids) in merged.iter().zip(sources) {
        if ids.len() > 1 {
            log::debug!(
                "Found {} groups named '{}', merging into one ({})",
                ids.len(),
                group.display_name,
                group.id()
            );
            progress(ScanEvent::NamesMerged {
                name: group.display_name.clone(),
                group_ids: ids,
            });
        }
    }

    merged
}

// -- Update resolution --

fn resolve_updates(group: &mut TitleGroup, progress: &dyn Fn(ScanEvent)) {
    if group.updates.len() <= 1 {
        return;
    }
    let candidates = group.updates.len();
    if let Some(latest) = select_latest_update(&group.updates).cloned() {
        log::debug!(
            "{}: keeping update {} out of {}",
            group.display_name,
            latest.file_name(),
            candidates
        );
        progress(ScanEvent::UpdateSelected {
            group_id: group.id(),
            file_name: latest.file_name().to_string(),
            candidates,
        });
        group.updates = vec![latest];
    }
}

/// Group a snapshot of files into titles.
///
/// Pure and deterministic: the same set of files always yields the same
/// mapping, whatever order they are passed in.
pub fn group_files(files: &[RawFile], progress: &dyn Fn(ScanEvent)) -> Grouping {
    let mut ordered: Vec<&RawFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.path().cmp(b.path()));

    let buckets = bucket_files(&ordered, progress);
    let candidates = aggregate(buckets, progress);
    let merged = merge_same_names(candidates, progress);

    let mut groups = BTreeMap::new();
    for mut group in merged {
        group.dedup_files();
        resolve_updates(&mut group, progress);
        groups.insert(group.id(), group);
    }

    progress(ScanEvent::Done {
        groups: groups.len(),
    });
    Grouping { groups }
}

#[cfg(test)]
#[path = "tests/grouping_tests.rs"]
mod tests;
