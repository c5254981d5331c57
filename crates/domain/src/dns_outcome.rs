use std::fmt;

/// Response code family a reply is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsOutcome {
    Success,
    FormatError,
    NameError,
    NotImplemented,
    ServerFailure,
}

impl DnsOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnsOutcome::Success => "NOERROR",
            DnsOutcome::FormatError => "FORMERR",
            DnsOutcome::NameError => "NXDOMAIN",
            DnsOutcome::NotImplemented => "NOTIMP",
            DnsOutcome::ServerFailure => "SERVFAIL",
        }
    }

    pub fn rcode(&self) -> u16 {
        match self {
            DnsOutcome::Success => 0,
            DnsOutcome::FormatError => 1,
            DnsOutcome::ServerFailure => 2,
            DnsOutcome::NameError => 3,
            DnsOutcome::NotImplemented => 4,
        }
    }
}

impl fmt::Display for DnsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
