//! # Artefato — Persistência do Bundle Treinado
//!
//! O artefato é um **diretório** com duas peças que só fazem sentido
//! juntas e viajam juntas:
//!
//! | Arquivo | Conteúdo |
//! |---------|----------|
//! | `manifest.json` | Versão de formato, `max_len` e o vocabulário completo |
//! | `model.safetensors` | Todos os tensores de pesos (embedding, encoder, atenção, cabeças) |
//!
//! ## Ciclo de Vida
//!
//! O treinamento offline produz o bundle via [`save`]; o serviço o carrega
//! **uma vez** na inicialização via [`load`] e o mantém somente-leitura
//! pelo resto do processo (sem hot-reload). O tamanho do vocabulário no
//! manifesto determina o número de linhas da tabela de embeddings na
//! reconstrução do modelo.
//!
//! ## Falhas
//!
//! | Condição | Erro |
//! |----------|------|
//! | Diretório/arquivos ausentes | [`ChatbotError::ModelArtifactMissing`] |
//! | Manifesto ilegível | [`ChatbotError::InvalidManifest`] |
//! | Versão de formato diferente | [`ChatbotError::WrongArtifactVersion`] |

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use serde::{Deserialize, Serialize};

use crate::error::ChatbotError;
use crate::nlu::model::ChatbotModel;
use crate::nlu::tokenizer::Tokenizer;

/// Nome do arquivo de manifesto dentro do bundle.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Nome do arquivo de pesos dentro do bundle.
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// Versão do formato de artefato que este binário escreve e lê.
pub const ARTIFACT_VERSION: &str = "1";

/// Manifesto do bundle: tudo que não é tensor.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Versão do formato — divergência é rejeitada no carregamento.
    pub version: String,
    /// Comprimento de sequência configurado no treinamento.
    pub max_len: usize,
    /// Vocabulário congelado do tokenizador.
    pub tokenizer: Tokenizer,
}

/// Resultado de um carregamento bem-sucedido: as três peças reunidas.
#[derive(Debug)]
pub struct LoadedArtifact {
    /// Modelo com os pesos restaurados, pronto para inferência.
    pub model: ChatbotModel,
    /// Tokenizador com o vocabulário do treinamento.
    pub tokenizer: Tokenizer,
    /// Comprimento de sequência a usar no `encode`.
    pub max_len: usize,
}

/// Salva um bundle completo em `dir` (criado se necessário).
///
/// Lado da escrita usado pelo treinador offline e pelos testes de
/// round-trip. O `varmap` deve conter exatamente os tensores criados por
/// [`ChatbotModel::new`].
pub fn save(dir: &Path, tokenizer: &Tokenizer, varmap: &VarMap, max_len: usize) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Falha ao criar diretório do artefato {:?}", dir))?;

    let manifest = Manifest {
        version: ARTIFACT_VERSION.to_string(),
        max_len,
        tokenizer: tokenizer.clone(),
    };
    let json = serde_json::to_string_pretty(&manifest).context("Falha ao serializar manifesto")?;
    fs::write(dir.join(MANIFEST_FILE), json)
        .with_context(|| format!("Falha ao escrever {MANIFEST_FILE}"))?;

    varmap
        .save(dir.join(WEIGHTS_FILE))
        .with_context(|| format!("Falha ao escrever {WEIGHTS_FILE}"))?;

    tracing::info!(dir = ?dir, "Artefato salvo");
    Ok(())
}

/// Carrega um bundle de `dir` e reconstrói o modelo com os pesos restaurados.
pub fn load(dir: &Path, device: &Device) -> Result<LoadedArtifact> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let weights_path = dir.join(WEIGHTS_FILE);
    if !manifest_path.exists() || !weights_path.exists() {
        return Err(ChatbotError::ModelArtifactMissing(dir.to_path_buf()).into());
    }

    let json = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Falha ao ler {:?}", manifest_path))?;
    let manifest: Manifest =
        serde_json::from_str(&json).map_err(|e| ChatbotError::InvalidManifest(e.to_string()))?;
    if manifest.version != ARTIFACT_VERSION {
        return Err(ChatbotError::WrongArtifactVersion {
            expected: ARTIFACT_VERSION,
            found: manifest.version,
        }
        .into());
    }

    // Mmap dos safetensors — mesmo caminho de carregamento usado para
    // qualquer modelo candle serializado em disco
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, device)? };
    let model = ChatbotModel::new(manifest.tokenizer.vocab_size(), vb)
        .context("Falha ao reconstruir o modelo a partir dos pesos")?;

    tracing::info!(
        vocab_size = manifest.tokenizer.vocab_size(),
        max_len = manifest.max_len,
        "Artefato carregado"
    );

    Ok(LoadedArtifact {
        model,
        tokenizer: manifest.tokenizer,
        max_len: manifest.max_len,
    })
}
