//! In-memory stores used by router and middleware tests.
//!
//! Semantics follow the Postgres repos: ids are assigned sequentially and never reused,
//! email uniqueness is enforced with `RepoError::Conflict`, and deleting a
//! user is not supported (nothing in the API does it).

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::repos::{
    course_repo::{CourseChanges, CourseRow, CourseStore, CourseWithOwnerRow, NewCourse},
    error::{RepoError, RepoResult},
    user_repo::{NewUser, UserRow, UserStore},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<BTreeMap<i64, UserRow>>,
    courses: Mutex<BTreeMap<i64, CourseRow>>,
    last_user_id: AtomicI64,
    last_course_id: AtomicI64,
    email_lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_email` calls so far.
    pub fn email_lookups(&self) -> usize {
        self.email_lookups.load(Ordering::SeqCst)
    }

    pub fn course_count(&self) -> usize {
        self.courses.lock().unwrap().len()
    }

    pub fn course(&self, course_id: i64) -> Option<CourseRow> {
        self.courses.lock().unwrap().get(&course_id).cloned()
    }

    fn with_owner(&self, course: CourseRow) -> Option<CourseWithOwnerRow> {
        let users = self.users.lock().unwrap();
        let owner = users.get(&course.user_id)?;
        Some(CourseWithOwnerRow {
            owner_first_name: owner.first_name.clone(),
            owner_last_name: owner.last_name.clone(),
            owner_email_address: owner.email_address.clone(),
            course,
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        self.email_lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email_address == email).cloned())
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRow> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email_address == user.email_address) {
            return Err(RepoError::Conflict);
        }
        let row = UserRow {
            id: self.last_user_id.fetch_add(1, Ordering::SeqCst) + 1,
            first_name: user.first_name,
            last_name: user.last_name,
            email_address: user.email_address,
            password_hash: user.password_hash,
        };
        users.insert(row.id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list_with_owner(&self) -> RepoResult<Vec<CourseWithOwnerRow>> {
        let courses: Vec<CourseRow> = self.courses.lock().unwrap().values().cloned().collect();
        Ok(courses
            .into_iter()
            .filter_map(|c| self.with_owner(c))
            .collect())
    }

    async fn get_with_owner(&self, course_id: i64) -> RepoResult<Option<CourseWithOwnerRow>> {
        let course = self.course(course_id);
        Ok(course.and_then(|c| self.with_owner(c)))
    }

    async fn find(&self, course_id: i64) -> RepoResult<Option<CourseRow>> {
        Ok(self.course(course_id))
    }

    async fn create(&self, owner_id: i64, course: NewCourse) -> RepoResult<CourseRow> {
        let mut courses = self.courses.lock().unwrap();
        let row = CourseRow {
            id: self.last_course_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
            user_id: owner_id,
        };
        courses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, course_id: i64, changes: CourseChanges) -> RepoResult<()> {
        let mut courses = self.courses.lock().unwrap();
        if let Some(row) = courses.get_mut(&course_id) {
            if let Some(title) = changes.title {
                row.title = title;
            }
            if let Some(description) = changes.description {
                row.description = description;
            }
            if let Some(estimated_time) = changes.estimated_time {
                row.estimated_time = estimated_time;
            }
            if let Some(materials_needed) = changes.materials_needed {
                row.materials_needed = materials_needed;
            }
        }
        Ok(())
    }

    async fn delete(&self, course_id: i64) -> RepoResult<()> {
        self.courses.lock().unwrap().remove(&course_id);
        Ok(())
    }
}
