//! Ad-insertion cue markers
//!
//! Two encodings are understood:
//!
//! - `#EXT-SCTE35:CUE="...",ID="...",TIME=..`: one attribute-list tag per cue.
//! - the OATCLS style, split over `#EXT-OATCLS-SCTE35:<payload>`,
//!   `#EXT-X-CUE-OUT:<duration>`, `#EXT-X-CUE-OUT-CONT:ElapsedTime=..,Duration=..,SCTE35=..`
//!   and `#EXT-X-CUE-IN`.

use crate::decode::attributes;
use crate::decode::engine::Ctx;
use crate::decode::tag::Tag;
use crate::error::Result;

/// Cue encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScteSyntax {
    /// `#EXT-SCTE35` attribute list
    Scte35,
    /// `#EXT-OATCLS-SCTE35` / `#EXT-X-CUE-*` tags
    Oatcls,
}

/// Position of a cue within an ad break
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueType {
    Start,
    Mid,
    End,
}

/// A cue marker attached to a segment
#[derive(Debug, Clone, PartialEq)]
pub struct Scte {
    pub syntax: ScteSyntax,
    pub cue_type: CueType,
    /// Base64 splice info
    pub cue: Option<String>,
    pub id: Option<String>,
    /// Planned break duration in seconds
    pub time: f64,
    /// Seconds since the break started
    pub elapsed: f64,
}

impl Scte {
    fn new(syntax: ScteSyntax, cue_type: CueType) -> Self {
        Self {
            syntax,
            cue_type,
            cue: None,
            id: None,
            time: 0.0,
            elapsed: 0.0,
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self.syntax {
            ScteSyntax::Scte35 => self.write_scte35(out),
            ScteSyntax::Oatcls => self.write_oatcls(out),
        }
    }

    fn write_scte35(&self, out: &mut String) {
        out.push_str("#EXT-SCTE35:");
        let mut attrs = Vec::new();
        if let Some(cue) = &self.cue {
            attrs.push(format!("CUE=\"{}\"", cue));
        }
        if let Some(id) = &self.id {
            attrs.push(format!("ID=\"{}\"", id));
        }
        if self.time != 0.0 {
            attrs.push(format!("TIME={}", self.time));
        }
        if self.cue_type == CueType::Mid || self.elapsed != 0.0 {
            attrs.push(format!("ELAPSED={}", self.elapsed));
        }
        if self.cue_type == CueType::End {
            attrs.push("CUE-IN=YES".to_string());
        }
        out.push_str(&attrs.join(","));
        out.push('\n');
    }

    fn write_oatcls(&self, out: &mut String) {
        match self.cue_type {
            CueType::Start => {
                if let Some(cue) = &self.cue {
                    out.push_str(&format!("#EXT-OATCLS-SCTE35:{}\n", cue));
                }
                out.push_str(&format!("#EXT-X-CUE-OUT:{}\n", self.time));
            }
            CueType::Mid => {
                out.push_str(&format!(
                    "#EXT-X-CUE-OUT-CONT:ElapsedTime={},Duration={}",
                    self.elapsed, self.time
                ));
                if let Some(cue) = &self.cue {
                    out.push_str(&format!(",SCTE35={}", cue));
                }
                out.push('\n');
            }
            CueType::End => out.push_str("#EXT-X-CUE-IN\n"),
        }
    }
}

/// `#EXT-SCTE35:CUE=..,ID=..,TIME=..[,ELAPSED=..][,CUE-IN=YES]`
pub(crate) fn decode_scte35(ctx: &Ctx<'_>, value: &str) -> Result<Scte> {
    let mut scte = Scte::new(ScteSyntax::Scte35, CueType::Start);
    for (name, v) in attributes::parse(value) {
        match name {
            "CUE" => scte.cue = Some(v.to_string()),
            "ID" => scte.id = Some(v.to_string()),
            "TIME" => scte.time = ctx.float(Tag::Scte35, v)?,
            "ELAPSED" => {
                scte.elapsed = ctx.float(Tag::Scte35, v)?;
                if scte.cue_type == CueType::Start {
                    scte.cue_type = CueType::Mid;
                }
            }
            "CUE-IN" if v == "YES" => scte.cue_type = CueType::End,
            _ => {}
        }
    }
    Ok(scte)
}

/// `#EXT-OATCLS-SCTE35:<payload>`, completed by a following `#EXT-X-CUE-OUT`
pub(crate) fn decode_oatcls(value: &str) -> Scte {
    let mut scte = Scte::new(ScteSyntax::Oatcls, CueType::Start);
    let payload = value.trim();
    if !payload.is_empty() {
        scte.cue = Some(payload.to_string());
    }
    scte
}

/// `#EXT-X-CUE-OUT:<duration>` or `#EXT-X-CUE-OUT:DURATION=<duration>`
///
/// Completes a pending OATCLS start cue, otherwise starts a new one.
pub(crate) fn decode_cue_out(ctx: &Ctx<'_>, pending: Option<Scte>, value: &str) -> Result<Scte> {
    let mut scte = match pending {
        Some(s) if s.syntax == ScteSyntax::Oatcls && s.cue_type == CueType::Start => s,
        _ => Scte::new(ScteSyntax::Oatcls, CueType::Start),
    };
    let value = value.trim();
    if value.contains('=') {
        for (name, v) in attributes::parse(value) {
            if name.eq_ignore_ascii_case("DURATION") {
                scte.time = ctx.float(Tag::CueOut, v)?;
            }
        }
    } else if !value.is_empty() {
        scte.time = ctx.float(Tag::CueOut, value)?;
    }
    Ok(scte)
}

/// `#EXT-X-CUE-OUT-CONT:ElapsedTime=..,Duration=..,SCTE35=..`
pub(crate) fn decode_cue_out_cont(ctx: &Ctx<'_>, value: &str) -> Result<Scte> {
    let mut scte = Scte::new(ScteSyntax::Oatcls, CueType::Mid);
    for (name, v) in attributes::parse(value) {
        match name {
            "ElapsedTime" => scte.elapsed = ctx.float(Tag::CueOutCont, v)?,
            "Duration" => scte.time = ctx.float(Tag::CueOutCont, v)?,
            "SCTE35" => scte.cue = Some(v.to_string()),
            _ => {}
        }
    }
    Ok(scte)
}

/// `#EXT-X-CUE-IN`
pub(crate) fn cue_in() -> Scte {
    Scte::new(ScteSyntax::Oatcls, CueType::End)
}
