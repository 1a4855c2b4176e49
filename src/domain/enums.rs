//! Closed vocabularies used by the stored records.
//!
//! Every enum serializes as its canonical token (`"NET_BANKING"`,
//! `"pending"`, ...) which is also the value stored in the database and
//! accepted by the import schemas. [`EnumToken`] exposes the token table so
//! the import normalizer can work over any of them generically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A token did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownToken {
    /// Enum type name.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

/// Enum with a fixed table of canonical string tokens.
pub trait EnumToken: Sized + Copy + 'static {
    /// Canonical tokens in declaration order.
    const TOKENS: &'static [&'static str];

    /// Extra spellings accepted on import, as `(SPELLING, CANONICAL)`.
    /// Spellings are compared after upper-casing and replacing spaces and
    /// hyphens with underscores.
    const SYNONYMS: &'static [(&'static str, &'static str)] = &[];

    /// Exact, case-sensitive token lookup.
    fn from_token(token: &str) -> Option<Self>;

    /// Canonical token of this value.
    fn as_token(&self) -> &'static str;
}

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
        $( synonyms { $( $syn:literal => $target:literal ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Canonical token of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $token, )+
                }
            }
        }

        impl EnumToken for $name {
            const TOKENS: &'static [&'static str] = &[$($token),+];
            $( const SYNONYMS: &'static [(&'static str, &'static str)] = &[$(($syn, $target)),*]; )?

            fn from_token(token: &str) -> Option<Self> {
                match token {
                    $( $token => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn as_token(&self) -> &'static str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as EnumToken>::from_token(s).ok_or_else(|| UnknownToken {
                    kind: stringify!($name),
                    value: s.to_string(),
                })
            }
        }
    };
}

token_enum! {
    /// Whether the donor is a person or an organization.
    UserType {
        /// A single donor.
        Individual => "INDIVIDUAL",
        /// A registered organization.
        Organization => "ORGANIZATION",
    }
    synonyms {
        "ORG" => "ORGANIZATION",
        "ORGANISATION" => "ORGANIZATION",
        "PERSON" => "INDIVIDUAL",
    }
}

token_enum! {
    /// Payment channel of a transaction.
    TransactionType {
        /// UPI transfer.
        Upi => "UPI",
        /// Bank transfer (NEFT/IMPS/RTGS).
        NetBanking => "NET_BANKING",
        /// Debit or credit card.
        Card => "CARD",
        /// Cash handed over in person.
        Cash => "CASH",
    }
    synonyms {
        "NETBANKING" => "NET_BANKING",
        "NEFT" => "NET_BANKING",
        "IMPS" => "NET_BANKING",
        "RTGS" => "NET_BANKING",
        "DEBIT_CARD" => "CARD",
        "CREDIT_CARD" => "CARD",
    }
}

token_enum! {
    /// Direction of the money movement.
    TransactionNature {
        /// Money received.
        Credit => "CREDIT",
        /// Money paid out.
        Debit => "DEBIT",
    }
}

token_enum! {
    /// How the transaction entered the system.
    EntryType {
        /// Keyed in by an admin.
        Manual => "MANUAL",
        /// Submitted through the public donation form.
        DonationForm => "DONATION_FORM",
    }
}

token_enum! {
    /// Verification status of a transaction.
    TransactionStatus {
        /// Awaiting review.
        Pending => "PENDING",
        /// Confirmed by an admin.
        Verified => "VERIFIED",
        /// Rejected by an admin.
        Rejected => "REJECTED",
    }
}

token_enum! {
    /// Cause a donation is earmarked for.
    MoneyFor {
        /// Clothing drives.
        Clothes => "CLOTHES",
        /// Food distribution.
        Food => "FOOD",
        /// Bicycle donation.
        Cycle => "CYCLE",
        /// School fees and supplies.
        Education => "EDUCATION",
        /// Medical support.
        Healthcare => "HEALTHCARE",
        /// Anything else; see `customMoneyFor`.
        Other => "OTHER",
    }
    synonyms {
        "CLOTH" => "CLOTHES",
        "CLOTHING" => "CLOTHES",
        "BICYCLE" => "CYCLE",
        "HEALTH" => "HEALTHCARE",
        "MEDICAL" => "HEALTHCARE",
    }
}

token_enum! {
    /// Spending category of an expenditure.
    ExpenditureCategory {
        /// Bicycles bought for beneficiaries.
        Cycle => "CYCLE",
        /// Ashram support.
        Ashram => "ASHRAM",
        /// Student sponsorship.
        Student => "STUDENT",
        /// Anything else; see `customCategory`.
        Other => "OTHER",
    }
}

token_enum! {
    /// Lifecycle tag of a donation drive. Transitions are not enforced.
    DriveStatus {
        /// Announced, not started.
        Pending => "pending",
        /// In progress.
        Active => "active",
        /// Finished.
        Completed => "completed",
    }
}
