/// Structural problems with an ICE candidate line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateError {
    #[error("Candidate line must start with 'candidate:'")]
    MissingPrefix,

    #[error("Candidate line has {found} fields, expected at least 8")]
    TooFewFields { found: usize },

    #[error("Invalid candidate {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// A structurally valid ICE candidate bound to one media section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceCandidate {
    sdp_mid: String,
    sdp_mline_index: u32,
    candidate: String,
    foundation: String,
    component: u16,
    protocol: String,
    priority: u32,
    address: String,
    port: u16,
    candidate_type: String,
}

const CANDIDATE_TYPES: [&str; 4] = ["host", "srflx", "prflx", "relay"];

impl IceCandidate {
    /// Build a candidate from its three wire fields.
    ///
    /// Accepts `candidate:...` with an optional `a=` prefix. Only the fixed
    /// leading fields are checked; trailing extensions (`generation`,
    /// `ufrag`, `raddr`...) are kept verbatim.
    pub fn new(
        sdp_mid: impl Into<String>,
        sdp_mline_index: u32,
        candidate: impl Into<String>,
    ) -> Result<Self, CandidateError> {
        let candidate = candidate.into();
        let line = candidate.trim();
        let line = line.strip_prefix("a=").unwrap_or(line);
        let body = line
            .strip_prefix("candidate:")
            .ok_or(CandidateError::MissingPrefix)?;

        let fields: Vec<&str> = body.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(CandidateError::TooFewFields {
                found: fields.len(),
            });
        }

        let component = parse_field::<u16>("component", fields[1])?;
        if component == 0 {
            return Err(invalid("component", fields[1]));
        }

        let protocol = fields[2].to_ascii_lowercase();
        if protocol != "udp" && protocol != "tcp" {
            return Err(invalid("transport", fields[2]));
        }

        let priority = parse_field::<u32>("priority", fields[3])?;
        let port = parse_field::<u16>("port", fields[5])?;

        if fields[6] != "typ" {
            return Err(invalid("typ keyword", fields[6]));
        }
        if !CANDIDATE_TYPES.contains(&fields[7]) {
            return Err(invalid("type", fields[7]));
        }

        Ok(Self {
            sdp_mid: sdp_mid.into(),
            sdp_mline_index,
            foundation: fields[0].to_string(),
            component,
            protocol,
            priority,
            address: fields[4].to_string(),
            port,
            candidate_type: fields[7].to_string(),
            candidate,
        })
    }

    pub fn sdp_mid(&self) -> &str {
        &self.sdp_mid
    }

    pub fn sdp_mline_index(&self) -> u32 {
        self.sdp_mline_index
    }

    /// The candidate line exactly as received or produced
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn foundation(&self) -> &str {
        &self.foundation
    }

    pub fn component(&self) -> u16 {
        self.component
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn candidate_type(&self) -> &str {
        &self.candidate_type
    }
}

fn invalid(field: &'static str, value: &str) -> CandidateError {
    CandidateError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, CandidateError> {
    value.parse().map_err(|_| invalid(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "candidate:1 1 UDP 2130706431 192.168.1.5 50000 typ host";

    #[test]
    fn test_parse_host_candidate() {
        let c = IceCandidate::new("audio", 0, HOST).unwrap();
        assert_eq!(c.sdp_mid(), "audio");
        assert_eq!(c.sdp_mline_index(), 0);
        assert_eq!(c.candidate(), HOST);
        assert_eq!(c.foundation(), "1");
        assert_eq!(c.component(), 1);
        assert_eq!(c.protocol(), "udp");
        assert_eq!(c.priority(), 2130706431);
        assert_eq!(c.address(), "192.168.1.5");
        assert_eq!(c.port(), 50000);
        assert_eq!(c.candidate_type(), "host");
    }

    #[test]
    fn test_parse_with_attribute_prefix_and_extensions() {
        let line = "a=candidate:842163049 1 udp 1677729535 203.0.113.7 61000 typ srflx raddr 10.0.0.2 rport 61000 generation 0";
        let c = IceCandidate::new("0", 1, line).unwrap();
        assert_eq!(c.candidate_type(), "srflx");
        assert_eq!(c.candidate(), line);
    }

    #[test]
    fn test_missing_prefix() {
        assert_eq!(
            IceCandidate::new("audio", 0, "1 1 UDP 1 1.2.3.4 5 typ host"),
            Err(CandidateError::MissingPrefix)
        );
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            IceCandidate::new("audio", 0, "candidate:1 1 UDP"),
            Err(CandidateError::TooFewFields { found: 3 })
        );
    }

    #[test]
    fn test_invalid_fields() {
        let bad_port = "candidate:1 1 UDP 2130706431 192.168.1.5 99999 typ host";
        assert!(matches!(
            IceCandidate::new("audio", 0, bad_port),
            Err(CandidateError::InvalidField { field: "port", .. })
        ));

        let bad_type = "candidate:1 1 UDP 2130706431 192.168.1.5 5000 typ nonsense";
        assert!(matches!(
            IceCandidate::new("audio", 0, bad_type),
            Err(CandidateError::InvalidField { field: "type", .. })
        ));

        let bad_transport = "candidate:1 1 SCTP 2130706431 192.168.1.5 5000 typ host";
        assert!(matches!(
            IceCandidate::new("audio", 0, bad_transport),
            Err(CandidateError::InvalidField { field: "transport", .. })
        ));
    }
}
