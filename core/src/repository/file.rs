use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::repository::traits::TaskRepository;

const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Local-file backend: the whole collection lives in one JSON array,
/// rewritten on every mutation. Small data sets only.
#[derive(Clone)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".todokit")
            }
        };
        fs::create_dir_all(&path)?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<Task>::new())?;
            writer.flush()?;
        }

        Ok(FileTaskRepository { file_path: path })
    }

    fn read_tasks(&self) -> Result<Vec<Task>, RepositoryError> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let tasks = serde_json::from_reader(reader)?;
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<(), RepositoryError> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.read_tasks()
    }

    async fn create(&self, draft: NewTask) -> Result<Task, RepositoryError> {
        let mut tasks = self.read_tasks()?;
        let task = Task::new(draft);
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        debug!(id = %task.id, path = %self.file_path.display(), "task appended");
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), RepositoryError> {
        let mut tasks = self.read_tasks()?;
        let pos = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        patch.apply(&mut tasks[pos]);
        self.write_tasks(&tasks)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tasks = self.read_tasks()?;
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == initial_len {
            return Err(RepositoryError::NotFound(id));
        }

        self.write_tasks(&tasks)
    }
}
