use crate::script::model::{ScriptMetadata, ScriptSegment, VideoScript};

fn seg(text: &str, duration: f64, visual: &str) -> ScriptSegment {
    ScriptSegment {
        text: text.to_owned(),
        duration,
        visual: visual.to_owned(),
    }
}

impl VideoScript {
    /// Built-in Portuguese demo script: hook, five body parts and a CTA (65 s of segments).
    ///
    /// Its metadata claims 60 s; the timeline follows the segment durations.
    pub fn demo() -> Self {
        Self {
            hook: seg(
                "Todo criador de conteúdo que usa IA pra fazer vídeos mais rápido tá na verdade perdendo mais tempo. E eu vou provar isso agora.",
                5.0,
                "Close-up direto pra câmera, expressão séria, texto overlay: 'VOCÊ TÁ USANDO IA ERRADO'",
            ),
            body: vec![
                seg(
                    "A galera acha que automação com IA é só apertar um botão e pronto. Aí passa 3 horas tentando fazer o ChatGPT gerar um roteiro decente, mais 2 horas editando porque a IA não entendeu o seu tom de voz.",
                    12.0,
                    "B-roll: tela de computador com múltiplas abas do ChatGPT abertas, pessoa frustrada olhando pro relógio",
                ),
                seg(
                    "Resultado? 5 horas pra fazer um vídeo que você faria em 30 minutos sozinho. Mas ninguém fala disso porque todo mundo quer vender curso de IA.",
                    8.0,
                    "Split screen: relógio correndo rápido de um lado, criador cansado do outro",
                ),
                seg(
                    "A verdade que ninguém conta: IA só acelera quando você tem SISTEMA. Não é a ferramenta, é o processo. Você precisa de prompts salvos, templates testados, workflow definido.",
                    12.0,
                    "Mostrar notion/doc com templates organizados, prompts salvos, checklist de produção",
                ),
                seg(
                    "Eu testo IA de conteúdo todo dia. Sabe o que funciona de verdade? IA pra 3 coisas específicas: ideação em massa, primeiro rascunho de roteiro, e legendas. Só. O resto é você.",
                    13.0,
                    "Motion graphics mostrando os 3 usos específicos, com ícones e exemplos rápidos",
                ),
                seg(
                    "E mais: se você tá pagando 5 ferramentas diferentes de IA pra criar vídeo, você tá queimando dinheiro. Uma ferramenta bem usada vale mais que dez mal aproveitadas.",
                    10.0,
                    "Animação de notas de dinheiro pegando fogo, depois mostra dashboard com múltiplas subscriptions",
                ),
            ],
            cta: seg(
                "Comenta aqui quantas ferramentas de IA você paga e nem usa direito. Vou responder todo mundo.",
                5.0,
                "Volta pro close-up, gesto apontando pra baixo (comentários), overlay: 'COMENTA AÍ'",
            ),
            metadata: ScriptMetadata {
                total_duration: 60.0,
                hook_pattern: "pattern_interrupt".to_owned(),
                hashtags: [
                    "#IAParaCriadores",
                    "#AutomacaoDeConteudo",
                    "#CriacaoDeVideos",
                    "#ProdutividadeIA",
                    "#ChatGPT",
                    "#CreatorEconomy",
                    "#DicasDeConteudo",
                    "#InteligenciaArtificial",
                ]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            },
        }
    }
}
