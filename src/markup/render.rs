use super::escape::escape_markup;
use super::verb::*;
use crate::context::CallContext;
use crate::error::RenderError;
use crate::options::CompilerOptions;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const DIAL_STATUS_EVENTS: &str = "initiated ringing answered completed";

/// Writes verbs as voice-response markup for one specific call.
pub struct MarkupWriter<'a> {
    context: &'a CallContext,
    options: &'a CompilerOptions,
}

impl<'a> MarkupWriter<'a> {
    pub fn new(context: &'a CallContext, options: &'a CompilerOptions) -> Self {
        Self { context, options }
    }

    /// Renders a complete document: XML declaration plus the `<Response>` root.
    pub fn render_document(&self, verbs: &[Verb]) -> Result<String, RenderError> {
        let mut writer = self.writer();
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if verbs.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("Response")))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new("Response")))?;
            for verb in verbs {
                self.write_verb(&mut writer, verb)?;
            }
            writer.write_event(Event::End(BytesEnd::new("Response")))?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Renders verbs without the surrounding document.
    pub fn render_fragment(&self, verbs: &[Verb]) -> Result<String, RenderError> {
        let mut writer = self.writer();
        for verb in verbs {
            self.write_verb(&mut writer, verb)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn writer(&self) -> Writer<Vec<u8>> {
        if self.options.pretty {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        }
    }

    fn write_verb(&self, w: &mut Writer<Vec<u8>>, verb: &Verb) -> Result<(), RenderError> {
        match verb {
            Verb::Say(speech) => self.write_speech(w, speech),
            Verb::Pause { length } => {
                write_empty(w, "Pause", &[("length", length.to_string())])
            }
            Verb::Gather(gather) => {
                let attrs = [
                    ("numDigits", gather.num_digits.to_string()),
                    ("timeout", gather.timeout.to_string()),
                    ("action", self.callback(&gather.action)),
                    ("method", "POST".to_string()),
                ];
                match &gather.prompt {
                    Some(prompt) => {
                        w.write_event(Event::Start(start_tag("Gather", &attrs)))?;
                        self.write_speech(w, prompt)?;
                        w.write_event(Event::End(BytesEnd::new("Gather")))?;
                        Ok(())
                    }
                    None => write_empty(w, "Gather", &attrs),
                }
            }
            Verb::Dial(dial) => {
                w.write_event(Event::Start(start_tag(
                    "Dial",
                    &[("timeout", dial.timeout.to_string())],
                )))?;
                if let Some(music) = &dial.hold_music {
                    write_playback(w, music)?;
                }
                write_text_element(
                    w,
                    "Number",
                    &[
                        ("statusCallback", self.callback(&dial.status_callback)),
                        ("statusCallbackEvent", DIAL_STATUS_EVENTS.to_string()),
                    ],
                    &dial.number,
                )?;
                w.write_event(Event::End(BytesEnd::new("Dial")))?;
                Ok(())
            }
            Verb::Play(playback) => write_playback(w, playback),
            Verb::Record(recording) => write_empty(
                w,
                "Record",
                &[
                    ("maxLength", recording.max_length.to_string()),
                    ("finishOnKey", recording.finish_on_key.clone()),
                    ("transcribe", recording.transcribe.to_string()),
                    ("recordingStatusCallback", self.callback(&recording.callback)),
                ],
            ),
            Verb::Sms(reply) => write_text_element(
                w,
                "Sms",
                &[("to", self.context.recipient(&reply.to))],
                &reply.body,
            ),
            Verb::Hangup => write_empty(w, "Hangup", &[]),
        }
    }

    fn write_speech(&self, w: &mut Writer<Vec<u8>>, speech: &Speech) -> Result<(), RenderError> {
        let attrs = [
            ("voice", speech.voice.clone()),
            ("language", speech.language.clone()),
        ];
        match speech.rate {
            Some(rate) => {
                w.write_event(Event::Start(start_tag("Say", &attrs)))?;
                write_text_element(w, "prosody", &[("rate", format!("{}%", rate))], &speech.text)?;
                w.write_event(Event::End(BytesEnd::new("Say")))?;
                Ok(())
            }
            None => write_text_element(w, "Say", &attrs, &speech.text),
        }
    }

    fn callback(&self, callback: &Callback) -> String {
        self.context.callback_url(callback, self.options)
    }
}

fn start_tag<'t>(tag: &'t str, attrs: &[(&str, String)]) -> BytesStart<'t> {
    let mut start = BytesStart::new(tag);
    for (key, value) in attrs {
        start.push_attribute((key.as_bytes(), escape_markup(value).as_bytes()));
    }
    start
}

fn write_empty(
    w: &mut Writer<Vec<u8>>,
    tag: &str,
    attrs: &[(&str, String)],
) -> Result<(), RenderError> {
    w.write_event(Event::Empty(start_tag(tag, attrs)))?;
    Ok(())
}

fn write_text_element(
    w: &mut Writer<Vec<u8>>,
    tag: &str,
    attrs: &[(&str, String)],
    text: &str,
) -> Result<(), RenderError> {
    w.write_event(Event::Start(start_tag(tag, attrs)))?;
    w.write_event(Event::Text(BytesText::from_escaped(escape_markup(text))))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_playback(w: &mut Writer<Vec<u8>>, playback: &Playback) -> Result<(), RenderError> {
    let attrs: Vec<(&str, String)> = playback
        .loop_count
        .map(|count| ("loop", count.to_string()))
        .into_iter()
        .collect();
    write_text_element(w, "Play", &attrs, &playback.url)
}
