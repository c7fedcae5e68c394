//! In-memory stores and fixtures for unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::achievements::repo_types::{
    Achievement, Award, CriteriaType, EarnedAchievement, UserAchievement,
};
use crate::food_logs::repo_types::{EntryFields, FoodLogEntry};
use crate::profiles::repo_types::GoalProfile;
use crate::store::{AchievementStore, EntryStore, ProfileStore, StoreError, WeightStore};
use crate::weights::repo_types::WeightLog;

pub fn entry_for(user_id: Uuid, logged_at: OffsetDateTime, calories: f64) -> FoodLogEntry {
    FoodLogEntry {
        id: Uuid::new_v4(),
        user_id,
        food_name: "test food".into(),
        description: None,
        serving_size: None,
        logged_at,
        calories,
        protein: 0.0,
        carbs: 0.0,
        fats: 0.0,
        fiber: None,
        sugar: None,
        sodium: None,
        created_at: logged_at,
    }
}

pub fn entry_at(logged_at: OffsetDateTime, calories: f64) -> FoodLogEntry {
    entry_for(Uuid::nil(), logged_at, calories)
}

pub fn achievement(name: &str, criteria_type: CriteriaType, criteria_value: i32) -> Achievement {
    Achievement {
        id: Uuid::new_v4(),
        name: name.into(),
        description: format!("{name} description"),
        icon: "trophy".into(),
        criteria_type,
        criteria_value,
    }
}

pub fn weight_log(weight_kg: f64, logged_at: OffsetDateTime) -> WeightLog {
    WeightLog {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        weight_kg,
        logged_at,
        notes: None,
        created_at: logged_at,
    }
}

fn injected() -> StoreError {
    StoreError::InvalidRow("injected failure".into())
}

pub struct MemoryEntryStore {
    pub offset: UtcOffset,
    entries: Mutex<Vec<FoodLogEntry>>,
    pub fail_counts: AtomicBool,
    pub fail_ranges: AtomicBool,
}

impl MemoryEntryStore {
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            offset,
            entries: Mutex::new(Vec::new()),
            fail_counts: AtomicBool::new(false),
            fail_ranges: AtomicBool::new(false),
        }
    }

    pub fn push(&self, entry: FoodLogEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    fn local_date(&self, e: &FoodLogEntry) -> Date {
        e.logged_at.to_offset(self.offset).date()
    }

    pub fn stored(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

fn apply_fields(e: &mut FoodLogEntry, f: &EntryFields) {
    e.food_name = f.food_name.trim().to_string();
    e.description = f.description.clone();
    e.serving_size = f.serving_size.clone();
    e.calories = f.calories;
    e.protein = f.protein;
    e.carbs = f.carbs;
    e.fats = f.fats;
    e.fiber = f.fiber;
    e.sugar = f.sugar;
    e.sodium = f.sodium;
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn entries_between(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<FoodLogEntry>, StoreError> {
        if self.fail_ranges.load(Ordering::SeqCst) {
            return Err(injected());
        }
        let mut out: Vec<FoodLogEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| (start..=end).contains(&self.local_date(e)))
            .map(|e| {
                let mut e = e.clone();
                e.logged_at = e.logged_at.to_offset(self.offset);
                e
            })
            .collect();
        out.sort_by_key(|e| e.logged_at);
        Ok(out)
    }

    async fn count_entries(
        &self,
        user_id: Uuid,
        since: Option<OffsetDateTime>,
    ) -> Result<i64, StoreError> {
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(injected());
        }
        let n = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| since.map_or(true, |s| e.logged_at >= s))
            .count();
        Ok(n as i64)
    }

    async fn entry_exists_on(&self, user_id: Uuid, day: Date) -> Result<bool, StoreError> {
        Ok(!self.entries_between(user_id, day, day).await?.is_empty())
    }

    async fn insert_entry(
        &self,
        user_id: Uuid,
        logged_at: OffsetDateTime,
        fields: &EntryFields,
    ) -> Result<FoodLogEntry, StoreError> {
        let mut entry = entry_for(user_id, logged_at, 0.0);
        apply_fields(&mut entry, fields);
        entry.created_at = OffsetDateTime::now_utc();
        self.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        logged_at: Option<OffsetDateTime>,
        fields: &EntryFields,
    ) -> Result<Option<FoodLogEntry>, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let Some(entry) = entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.user_id == user_id)
        else {
            return Ok(None);
        };
        apply_fields(entry, fields);
        if let Some(at) = logged_at {
            entry.logged_at = at;
        }
        Ok(Some(entry.clone()))
    }

    async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(e.id == entry_id && e.user_id == user_id));
        Ok(entries.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryAchievementStore {
    catalog: Vec<Achievement>,
    earned: Mutex<Vec<UserAchievement>>,
    pub fail_catalog: AtomicBool,
    /// Hide earned rows from `earned_ids`, as if another session awarded them
    /// after this pass loaded its snapshot.
    pub stale_earned: AtomicBool,
    pub fail_award_for: Mutex<Option<Uuid>>,
}

impl MemoryAchievementStore {
    pub fn new(mut catalog: Vec<Achievement>) -> Self {
        catalog.sort_by_key(|a| a.criteria_value);
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn earned_count(&self, user_id: Uuid) -> usize {
        self.earned
            .lock()
            .unwrap()
            .iter()
            .filter(|ua| ua.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl AchievementStore for MemoryAchievementStore {
    async fn catalog(&self) -> Result<Vec<Achievement>, StoreError> {
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(self.catalog.clone())
    }

    async fn earned_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        if self.stale_earned.load(Ordering::SeqCst) {
            return Ok(HashSet::new());
        }
        Ok(self
            .earned
            .lock()
            .unwrap()
            .iter()
            .filter(|ua| ua.user_id == user_id)
            .map(|ua| ua.achievement_id)
            .collect())
    }

    async fn award(&self, user_id: Uuid, achievement_id: Uuid) -> Result<Award, StoreError> {
        if *self.fail_award_for.lock().unwrap() == Some(achievement_id) {
            return Err(injected());
        }
        let mut earned = self.earned.lock().unwrap();
        if earned
            .iter()
            .any(|ua| ua.user_id == user_id && ua.achievement_id == achievement_id)
        {
            return Ok(Award::AlreadyEarned);
        }
        let record = UserAchievement {
            id: Uuid::new_v4(),
            user_id,
            achievement_id,
            earned_at: OffsetDateTime::now_utc(),
        };
        earned.push(record.clone());
        Ok(Award::Inserted(record))
    }

    async fn earned_for_user(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>, StoreError> {
        let earned = self.earned.lock().unwrap();
        let mut out: Vec<EarnedAchievement> = earned
            .iter()
            .filter(|ua| ua.user_id == user_id)
            .filter_map(|ua| {
                let achievement = self.catalog.iter().find(|a| a.id == ua.achievement_id)?;
                Some(EarnedAchievement {
                    record: ua.clone(),
                    achievement: achievement.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| b.record.earned_at.cmp(&a.record.earned_at));
        Ok(out)
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<Vec<GoalProfile>>,
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<GoalProfile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn upsert_profile(&self, profile: &GoalProfile) -> Result<GoalProfile, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        profiles.retain(|p| p.user_id != profile.user_id);
        profiles.push(profile.clone());
        Ok(profile.clone())
    }
}

#[derive(Default)]
pub struct MemoryWeightStore {
    logs: Mutex<Vec<WeightLog>>,
}

#[async_trait]
impl WeightStore for MemoryWeightStore {
    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        logged_at: OffsetDateTime,
        notes: Option<&str>,
    ) -> Result<WeightLog, StoreError> {
        let log = WeightLog {
            user_id,
            notes: notes.map(String::from),
            created_at: OffsetDateTime::now_utc(),
            ..weight_log(weight_kg, logged_at)
        };
        self.logs.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightLog>, StoreError> {
        let mut out: Vec<WeightLog> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(out)
    }

    async fn delete_weight(&self, user_id: Uuid, weight_id: Uuid) -> Result<bool, StoreError> {
        let mut logs = self.logs.lock().unwrap();
        let before = logs.len();
        logs.retain(|l| !(l.id == weight_id && l.user_id == user_id));
        Ok(logs.len() < before)
    }
}
