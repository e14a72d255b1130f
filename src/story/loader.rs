use std::path::{Path, PathBuf};
use tokio::fs;
use crate::story::Storyboard;
use crate::utils::{GameError, GameResult};
use tracing::{info, warn};

/// Reads storyboards from JSON, falling back to the built-in Lohri tale.
pub struct StoryLoader {
    storyboard_path: Option<PathBuf>,
}

impl StoryLoader {
    pub fn new(storyboard_path: Option<PathBuf>) -> Self {
        Self { storyboard_path }
    }

    pub async fn load(&self) -> GameResult<Storyboard> {
        match &self.storyboard_path {
            Some(path) => self.load_storyboard(path).await,
            None => {
                info!("Using the built-in Lohri storyboard");
                Ok(Storyboard::lohri())
            }
        }
    }

    pub async fn load_storyboard<P: AsRef<Path>>(&self, path: P) -> GameResult<Storyboard> {
        let path = path.as_ref();
        info!("Loading storyboard from: {:?}", path);

        if !path.exists() {
            return Err(GameError::story(format!("Storyboard file not found: {:?}", path)));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| GameError::story(format!("Failed to read storyboard file: {}", e)))?;

        let board: Storyboard = serde_json::from_str(&content)
            .map_err(|e| GameError::story(format!("Failed to parse storyboard JSON: {}", e)))?;

        if let Err(errors) = board.validate() {
            let error_msg = errors.join("; ");
            return Err(GameError::story(format!("Storyboard validation failed: {}", error_msg)));
        }

        info!("Successfully loaded storyboard: {} ({} panels)", board.title, board.panels.len());
        Ok(board)
    }

    pub async fn save_storyboard<P: AsRef<Path>>(&self, board: &Storyboard, path: P) -> GameResult<()> {
        if let Err(errors) = board.validate() {
            let error_msg = errors.join("; ");
            return Err(GameError::story(format!("Cannot save invalid storyboard: {}", error_msg)));
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GameError::story(format!("Failed to create directory: {}", e)))?;
        }

        if path.exists() {
            warn!("Overwriting existing storyboard at {:?}", path);
        }

        let json = serde_json::to_string_pretty(board)
            .map_err(|e| GameError::story(format!("Failed to serialize storyboard: {}", e)))?;

        fs::write(path, json)
            .await
            .map_err(|e| GameError::story(format!("Failed to write storyboard file: {}", e)))?;

        info!("Saved storyboard: {} to {:?}", board.id, path);
        Ok(())
    }

    /// Writes the built-in tale as a starting point for custom storyboards.
    pub async fn export_builtin<P: AsRef<Path>>(&self, path: P) -> GameResult<Storyboard> {
        let board = Storyboard::lohri();
        self.save_storyboard(&board, path).await?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::StoryPanel;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_default_storyboard() {
        let loader = StoryLoader::new(None);
        let board = loader.load().await.unwrap();
        assert_eq!(board.id, "lohri");
        assert_eq!(board.panels.len(), 6);
    }

    #[tokio::test]
    async fn test_export_and_reload() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("boards").join("lohri.json");

        let loader = StoryLoader::new(Some(path.clone()));
        let exported = loader.export_builtin(&path).await.unwrap();
        let loaded = loader.load().await.unwrap();

        assert_eq!(exported, loaded);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let loader = StoryLoader::new(Some(temp_dir.path().join("nope.json")));

        let error = loader.load().await.unwrap_err();
        assert!(error.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loader = StoryLoader::new(Some(path));
        let error = loader.load().await.unwrap_err();
        assert!(error.to_string().contains("Failed to parse storyboard JSON"));
    }

    #[tokio::test]
    async fn test_rejects_invalid_storyboard() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("empty.json");
        let loader = StoryLoader::new(Some(path.clone()));

        let empty = Storyboard::new("empty", "Empty");
        assert!(loader.save_storyboard(&empty, &path).await.is_err());

        std::fs::write(&path, serde_json::to_string(&empty).unwrap()).unwrap();
        let error = loader.load().await.unwrap_err();
        assert!(error.to_string().contains("validation failed"));
    }

    #[tokio::test]
    async fn test_custom_storyboard_without_art() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("short.json");
        let json = serde_json::json!({
            "id": "short",
            "title": "Short Tale",
            "description": "",
            "author": "",
            "version": "1.0.0",
            "panels": [
                { "id": "one", "title": "One", "text": "The fire is lit.", "emblem": "🔥" }
            ],
            "metadata": null
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let board = StoryLoader::new(Some(path)).load().await.unwrap();
        assert_eq!(
            board.panels,
            vec![StoryPanel::new("one", "One", "The fire is lit.", "🔥")]
        );
    }
}
