//! In-memory [`AdminSession`] driven by canned answers.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;

use flwatch_model::SystemInfo;

use crate::session::{AdminSession, SessionError, SessionResult};

type Answer<T> = Result<T, String>;

pub(crate) struct ScriptedSession {
    jobs: Mutex<Answer<Vec<Value>>>,
    metas: Mutex<HashMap<String, Answer<Value>>>,
    /// Consumed front to back; the last answer repeats once the queue drains.
    system_info: Mutex<VecDeque<Answer<SystemInfo>>>,
    pub(crate) meta_calls: AtomicUsize,
    pub(crate) system_info_calls: AtomicUsize,
    pub(crate) close_calls: AtomicUsize,
}

impl ScriptedSession {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(Ok(Vec::new())),
            metas: Mutex::new(HashMap::new()),
            system_info: Mutex::new(VecDeque::new()),
            meta_calls: AtomicUsize::new(0),
            system_info_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn jobs(self, jobs: Vec<Value>) -> Self {
        *self.jobs.lock().unwrap() = Ok(jobs);
        self
    }

    pub(crate) fn jobs_error(self, message: &str) -> Self {
        *self.jobs.lock().unwrap() = Err(message.to_string());
        self
    }

    pub(crate) fn meta(self, job_id: &str, meta: Value) -> Self {
        self.metas.lock().unwrap().insert(job_id.to_string(), Ok(meta));
        self
    }

    pub(crate) fn meta_error(self, job_id: &str, message: &str) -> Self {
        self.metas
            .lock()
            .unwrap()
            .insert(job_id.to_string(), Err(message.to_string()));
        self
    }

    pub(crate) fn system_info(self, answer: Answer<SystemInfo>) -> Self {
        self.system_info.lock().unwrap().push_back(answer);
        self
    }
}

#[async_trait]
impl AdminSession for ScriptedSession {
    async fn list_jobs(&self) -> SessionResult<Vec<Value>> {
        self.jobs
            .lock()
            .unwrap()
            .clone()
            .map_err(|m| SessionError::query("list_jobs", m))
    }

    async fn get_job_meta(&self, job_id: &str) -> SessionResult<Value> {
        self.meta_calls.fetch_add(1, Ordering::SeqCst);
        match self.metas.lock().unwrap().get(job_id) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(m)) => Err(SessionError::query("get_job_meta", m.clone())),
            None => Err(SessionError::query("get_job_meta", format!("no such job {job_id}"))),
        }
    }

    async fn get_system_info(&self) -> SessionResult<SystemInfo> {
        self.system_info_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.system_info.lock().unwrap();
        let answer = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match answer {
            Some(Ok(si)) => Ok(si),
            Some(Err(m)) => Err(SessionError::query("get_system_info", m)),
            None => Ok(SystemInfo::Text(String::new())),
        }
    }

    async fn close(&self) -> SessionResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
