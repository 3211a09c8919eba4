//! Generación de mapas mentales: compone el prompt, llama a Ollama y repara
//! la salida con [`crate::diagram`].

use tracing::{debug, info, warn};

use crate::{
    diagram::{count_root_markers, repair_mindmap},
    error::ServiceError,
    llm::OllamaClient,
    models::{DetailLevel, MapRequest},
};

const SYSTEM_PROMPT: &str = r#"Eres un experto en crear mapas mentales VISUALES usando Mermaid.js.

REGLAS ESTRICTAS:
1. Devuelve SOLO código Mermaid puro, sin markdown, sin explicaciones.
2. SIEMPRE comienza con 'mindmap' en la primera línea.
3. DEBE haber EXACTAMENTE UN nodo raíz llamado 'root((Tema))' con doble paréntesis.
4. TODOS los demás nodos DEBEN estar dentro del árbol del root como hijos.
5. Estructura OBLIGATORIA:
   mindmap
     root((🎯 Tema Principal))
       📚 SubTema1
         Detalle1
       🔍 SubTema2
         Detalle2
6. Usa indentación de 2 espacios por nivel.
7. OBLIGATORIO: Agrega emojis relevantes al inicio de CADA nodo (excepto detalles).
8. USA FORMAS VISUALES para nodos importantes:
   - (( )) para nodos principales
   - [ ] para categorías
   - ( ) para conceptos clave
9. Nombres cortos (máximo 4 palabras por nodo).
10. Máximo 3 niveles de profundidad.

IMPORTANTE: TODO debe estar bajo UN ÚNICO root, NO crees múltiples raíces."#;

const EMOJI_GUIDE: &str = r#"EMOJIS SUGERIDOS POR CATEGORÍA:
- Educación: 📚 📖 🎓 ✏️ 🧠 📝 🔖
- Ciencia: 🔬 🧪 🌡️ ⚗️ 🧬 🔭 ⚛️
- Tecnología: 💻 🖥️ 📱 ⚙️ 🔧 🤖 💡
- Naturaleza: 🌱 🌿 🌳 🌍 ⛰️ 🌊 ☀️
- Procesos: ⚡ 🔄 ➡️ 🎯 ⭐ 💫 ✨
- Personas: 👨‍🎓 👩‍🔬 👥 🧑‍💼
- Salud: ❤️ 🏥 💊 🩺 🧘

EJEMPLO CORRECTO (CON EMOJIS Y FORMAS):
mindmap
  root((🌱 Fotosíntesis))
    🔬 [Proceso]
      ☀️ (Luz solar)
        Energía lumínica
      🌿 (Clorofila)
        Pigmento verde
    ✨ [Productos]
      💨 Oxígeno O2
      🍬 Glucosa C6H12O6

REGLAS FINALES:
- USA emojis relevantes del tema
- Aplica formas (( )), [ ], ( ) según importancia
- TODO bajo UN root
- NO markdown, SOLO código Mermaid"#;

/// Instrucciones de sistema: reglas de estructura, formas y emojis.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Prompt de usuario con el tema y la instrucción de nivel de detalle.
pub fn user_prompt(topic: &str, detail: DetailLevel) -> String {
    format!(
        "Crea un mapa mental VISUAL sobre: '{topic}'.\n{}\n\n{EMOJI_GUIDE}\n\nGenera ahora:",
        detail.instruction()
    )
}

/// Genera el código Mermaid reparado para la petición.
pub async fn generate_mindmap(
    llm: &OllamaClient,
    request: &MapRequest,
) -> Result<String, ServiceError> {
    let detail = request.detail();
    info!(
        "Generando mapa mental sobre '{}' (detalle: {:?})",
        request.topic, detail
    );

    let prompt = user_prompt(&request.topic, detail);
    let raw = llm.complete(&prompt, system_prompt()).await?;
    let diagram = repair_mindmap(&raw);

    let roots = count_root_markers(&diagram);
    if roots > 1 {
        warn!("El mapa generado contiene {} nodos raíz; se devuelve sin fusionar.", roots);
    }
    debug!("Mapa mental generado:\n{}", diagram);

    Ok(diagram)
}
